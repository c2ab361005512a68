mod common;

use axum::http::StatusCode;
use ferreteria_backend::{models::user::Role, services::email_service::EmailTemplate};
use serde_json::json;

use common::{assert_fields_match, TestApp};

fn application_body() -> serde_json::Value {
    json!({
        "first_name": "Ana",
        "last_name": "Torres Gil",
        "email": "ana.torres@correo.mx",
        "phone": "33 9876 5432",
        "education_level": "preparatoria",
        "accepts_privacy_policy": true
    })
}

#[tokio::test]
async fn applications_take_the_posting_title() {
    let app = TestApp::new();
    let hr = app.token_for(Role::Hr).await;
    let (_, posting) = app
        .json(
            "POST",
            "/api/jobs",
            Some(&hr),
            json!({
                "title": "Almacenista",
                "location": "Zapopan",
                "description": "Recepción y acomodo de mercancía."
            }),
        )
        .await;

    let mut body = application_body();
    body["job_id"] = posting["data"]["id"].clone();
    let (status, response) = app.json("POST", "/api/job-applications", None, body).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    assert_eq!(response["data"]["status"], "nueva");

    let uri = format!("/api/job-applications/{}", response["data"]["id"].as_str().unwrap());
    let (status, stored) = app.get(&uri, Some(&hr)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["data"]["job_title"], "Almacenista");

    assert_eq!(
        app.mailer.templates(),
        vec![EmailTemplate::ApplicationConfirmation, EmailTemplate::ApplicationInternal]
    );
}

#[tokio::test]
async fn open_applications_are_filed_as_general() {
    let app = TestApp::new();
    let hr = app.token_for(Role::Hr).await;

    let (status, response) = app
        .json("POST", "/api/job-applications", None, application_body())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/job-applications/{}", response["data"]["id"].as_str().unwrap());
    let (_, stored) = app.get(&uri, Some(&hr)).await;
    assert_eq!(stored["data"]["job_title"], "Solicitud general");
}

#[tokio::test]
async fn privacy_notice_must_be_accepted() {
    let app = TestApp::new();
    let mut body = application_body();
    body["accepts_privacy_policy"] = json!(false);

    let (status, response) = app.json("POST", "/api/job-applications", None, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("aviso de privacidad"));
}

#[tokio::test]
async fn hr_moves_applications_through_the_pipeline() {
    let app = TestApp::new();
    let hr = app.token_for(Role::Hr).await;
    let (_, response) = app
        .json("POST", "/api/job-applications", None, application_body())
        .await;
    let uri = format!("/api/job-applications/{}", response["data"]["id"].as_str().unwrap());

    let (status, _) = app
        .json("PATCH", &uri, Some(&hr), json!({ "status": "contratada" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for next in ["revisada", "entrevista", "rechazada"] {
        let (status, body) = app.json("PATCH", &uri, Some(&hr), json!({ "status": next })).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], next);
        assert_eq!(body["data"]["reviewed_by"], "hr@ferreteria.test");
    }

    let (status, _) = app
        .json("PATCH", &uri, Some(&hr), json!({ "status": "entrevista" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/job-applications?status=rechazada", Some(&hr)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn every_submitted_field_is_stored_verbatim() {
    let app = TestApp::new();
    let hr = app.token_for(Role::Hr).await;
    let sent = json!({
        "job_id": "jobs-externo-7",
        "job_title": "Vendedor de mostrador",
        "first_name": "Ana",
        "last_name": "Torres Gil",
        "email": "ana.torres@correo.mx",
        "phone": "33 9876 5432",
        "city": "Tlaquepaque",
        "birth_date": "1994-05-17",
        "education_level": "licenciatura",
        "experience": "Cinco años en ferretería.\nManejo de inventarios.",
        "expected_salary": "14,000 mensuales",
        "availability": "Inmediata",
        "cv_url": "https://cdn.ferreteria.mx/cv/ana-torres.pdf",
        "accepts_privacy_policy": true,
        "wants_job_alerts": true
    });

    let (status, response) = app.json("POST", "/api/job-applications", None, sent.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    let uri = format!("/api/job-applications/{}", response["data"]["id"].as_str().unwrap());
    let (status, stored) = app.get(&uri, Some(&hr)).await;
    assert_eq!(status, StatusCode::OK);

    assert_fields_match(&sent, &stored["data"]);
    assert_eq!(stored["data"]["status"], "nueva");
}
