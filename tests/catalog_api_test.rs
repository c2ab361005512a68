mod common;

use axum::http::StatusCode;
use ferreteria_backend::{models::user::Role, routes, AppState};
use serde_json::json;

use common::{assert_fields_match, TestApp};

fn branch_body() -> serde_json::Value {
    json!({
        "name": "Sucursal Norte",
        "address": "Av. Industria 45",
        "city": "Monterrey",
        "phone": "81 1234 5678",
        "featured": true
    })
}

#[tokio::test]
async fn catalog_reads_are_public_and_writes_need_an_editor() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/branches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = app.json("POST", "/api/branches", None, branch_body()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let manager = app.token_for(Role::Manager).await;
    let (status, _) = app.json("POST", "/api/branches", Some(&manager), branch_body()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.token_for(Role::Admin).await;
    let (status, body) = app.json("POST", "/api/branches", Some(&admin), branch_body()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["active"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/branches/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Monterrey");
}

#[tokio::test]
async fn each_collection_has_its_own_editors() {
    let app = TestApp::new();
    let manager = app.token_for(Role::Manager).await;
    let hr = app.token_for(Role::Hr).await;

    let news = json!({ "title": "Nueva sucursal", "content": "Abrimos en Monterrey." });
    let (status, _) = app.json("POST", "/api/news", Some(&manager), news.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.json("POST", "/api/news", Some(&hr), news).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let job = json!({
        "title": "Vendedor de piso",
        "location": "Guadalajara",
        "description": "Atención a clientes en mostrador."
    });
    let (status, _) = app.json("POST", "/api/jobs", Some(&hr), job.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.json("POST", "/api/jobs", Some(&manager), job).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn partial_updates_keep_other_fields_and_are_rechecked() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let (_, body) = app.json("POST", "/api/branches", Some(&admin), branch_body()).await;
    let uri = format!("/api/branches/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = app
        .json("PUT", &uri, Some(&admin), json!({ "opening_hours": "Lun a Dom 8:00 - 20:00" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Sucursal Norte");
    assert_eq!(body["data"]["opening_hours"], "Lun a Dom 8:00 - 20:00");

    let (status, _) = app.json("PUT", &uri, Some(&admin), json!({ "phone": "123" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = app.get(&uri, None).await;
    assert_eq!(body["data"]["phone"], "81 1234 5678");
}

#[tokio::test]
async fn deactivated_records_leave_the_public_list() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let (_, first) = app.json("POST", "/api/branches", Some(&admin), branch_body()).await;
    let mut second = branch_body();
    second["name"] = json!("Sucursal Sur");
    second["featured"] = json!(false);
    app.json("POST", "/api/branches", Some(&admin), second).await;

    let (_, body) = app.get("/api/branches?featured=true", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/branches/{}", first["data"]["id"].as_str().unwrap());
    for _ in 0..2 {
        let (status, body) = app.send(common::request("DELETE", &uri, Some(&admin), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["active"], false);
    }

    let (_, body) = app.get("/api/branches", None).await;
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Sucursal Sur"]);

    // Direct lookups still see inactive records.
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn without_a_database_the_catalog_serves_fallback_data() {
    let app = TestApp::new();
    let router = routes::router(AppState::new(common::test_config(), None).unwrap());
    let app = TestApp { router, ..app };

    let (status, body) = app.get("/api/branches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["data"].as_array().unwrap().is_empty());

    let (status, _) = app.get("/api/branches/branches-1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/branches/branches-999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn every_branch_field_is_stored_verbatim() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let sent = json!({
        "name": "Sucursal Cumbres",
        "address": "Av. Paseo de los Leones 1500",
        "city": "Monterrey",
        "state": "Nuevo León",
        "postal_code": "64610",
        "phone": "81 8300 1200",
        "email": "cumbres@ferreteria.mx",
        "whatsapp": "81 1111 2222",
        "opening_hours": "Lun a Dom 8:00 - 20:00",
        "latitude": 25.7317,
        "longitude": -100.4016,
        "manager_name": "Jorge Salinas",
        "image_url": "https://cdn.ferreteria.mx/sucursales/cumbres.jpg",
        "active": true,
        "featured": true
    });

    let (status, created) = app.json("POST", "/api/branches", Some(&admin), sent.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let uri = format!("/api/branches/{}", created["data"]["id"].as_str().unwrap());
    let (status, stored) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);

    assert_fields_match(&sent, &stored["data"]);
}
