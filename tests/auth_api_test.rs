mod common;

use axum::http::StatusCode;
use ferreteria_backend::{
    config::Config,
    models::user::Role,
    services::auth_service::AuthService,
};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn login_returns_a_token_that_opens_staff_routes() {
    let app = TestApp::new();
    app.seed_user("gerente@ferreteria.test", Role::Manager).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "GERENTE@ferreteria.test", "password": "secreto123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["role"], "manager");
    assert!(body["data"]["user"].get("password_hash").is_none());
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["email"], "gerente@ferreteria.test");

    let (status, stats) = app.get("/api/dashboard/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["data"]["contact_requests"]["total"], 0);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::new();
    app.seed_user("rh@ferreteria.test", Role::Hr).await;

    let (status, wrong) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "rh@ferreteria.test", "password": "otra" }),
        )
        .await;
    let (status_unknown, unknown) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "nadie@ferreteria.test", "password": "otra" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["error"], unknown["error"]);
}

#[tokio::test]
async fn only_admins_manage_users() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let it = app.token_for(Role::It).await;
    let new_user = json!({
        "email": "vendedor2@ferreteria.test",
        "name": "Vendedor Dos",
        "role": "vendor",
        "password": "clave-segura"
    });

    let (status, _) = app.json("POST", "/api/users", Some(&it), new_user.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.json("POST", "/api/users", Some(&admin), new_user.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["role"], "vendor");

    let (status, _) = app.json("POST", "/api/users", Some(&admin), new_user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn debug_env_reports_integrations_without_secrets() {
    let app = TestApp::new();
    let it = app.token_for(Role::It).await;

    let (status, body) = app.get("/api/debug/env", Some(&it)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["email"], true);
    assert!(!body.to_string().contains("test-key"));
    assert!(!body.to_string().contains(common::JWT_SECRET));

    let hr = app.token_for(Role::Hr).await;
    let (status, _) = app.get("/api/debug/env", Some(&hr)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn without_a_jwt_secret_staff_routes_answer_503() {
    let app = TestApp::with_config(Config {
        jwt_secret: None,
        ..common::test_config()
    });

    let (status, _) = app.get("/api/requests", Some("anything")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (status, _) = app
        .json("POST", "/api/auth/login", None, json!({ "email": "a@b.mx", "password": "x" }))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn bootstrap_admin_is_created_once() {
    let app = TestApp::with_config(Config {
        admin_email: Some("Admin@Ferreteria.test".into()),
        admin_password: Some("arranque-123".into()),
        ..common::test_config()
    });
    let service = AuthService::new(app.store.clone(), app.state.config.clone());

    assert!(service.bootstrap_admin().await.unwrap());
    assert!(!service.bootstrap_admin().await.unwrap());

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "admin@ferreteria.test", "password": "arranque-123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["role"], "admin");
}
