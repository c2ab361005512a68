mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use ferreteria_backend::{
    database::collection::Collection,
    models::{
        file_record::{self, FileCategory, FileRecord},
        user::Role,
    },
    routes, AppState,
};

use common::TestApp;

const BOUNDARY: &str = "----ferreteria-test-boundary";

fn multipart_request(token: &str, file: &[u8], file_name: &str, category: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(category) = category {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\n{category}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/files")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 64]);
    data
}

#[tokio::test]
async fn uploads_go_to_the_media_host_and_can_be_deleted() {
    let app = TestApp::new();
    let it = app.token_for(Role::It).await;

    let (status, body) = app
        .send(multipart_request(&it, &png_bytes(), "Logo Truper.png", Some("brands")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["category"], "brands");
    assert_eq!(body["data"]["content_type"], "image/png");
    assert_eq!(body["data"]["uploaded_by"], "it@ferreteria.test");
    assert!(body["data"]["url"].as_str().unwrap().starts_with("https://media.test/brands/"));
    assert_eq!(
        body["data"]["thumbnail_url"],
        "https://media.test/c_fill,w_400,h_400/brands/logo_truper.png"
    );
    assert_eq!(app.media.uploaded.lock().unwrap().len(), 1);

    let (status, list) = app.get("/api/files?category=brands", Some(&it)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"]["total"], 1);

    let uri = format!("/api/files/{}", body["data"]["id"].as_str().unwrap());
    let (status, _) = app.send(common::request("DELETE", &uri, Some(&it), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.media.destroyed.lock().unwrap().len(), 1);

    let (status, _) = app.send(common::request("DELETE", &uri, Some(&it), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn content_is_sniffed_not_trusted_from_the_name() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;

    let (status, body) = app
        .send(multipart_request(&admin, b"MZ\x90\x00 not an image", "foto.png", Some("news")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Tipo de archivo no permitido"));
    assert!(app.media.uploaded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn category_is_required_and_vendors_cannot_upload() {
    let app = TestApp::new();
    let manager = app.token_for(Role::Manager).await;
    let (status, _) = app
        .send(multipart_request(&manager, &png_bytes(), "a.png", None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let vendor = app.token_for(Role::Vendor).await;
    let (status, _) = app
        .send(multipart_request(&vendor, &png_bytes(), "a.png", Some("news")))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stored_files_are_listed_without_a_media_host() {
    let app = TestApp::new();
    let files: Collection<FileRecord> = Collection::new(app.store.clone(), file_record::COLLECTION);
    files
        .insert(&FileRecord {
            name: "catalogo.pdf".into(),
            size: 2048,
            content_type: "application/pdf".into(),
            url: "https://media.test/documents/catalogo.pdf".into(),
            public_id: "documents/catalogo.pdf".into(),
            resource_type: "raw".into(),
            folder: "documents".into(),
            category: FileCategory::Documents,
            uploaded_by: "it@ferreteria.test".into(),
            thumbnail_url: None,
        })
        .await
        .unwrap();

    let state = AppState::new(common::test_config(), Some(app.store.clone())).unwrap();
    let app = TestApp {
        router: routes::router(state),
        ..app
    };
    let it = app.token_for(Role::It).await;

    let (status, list) = app.get("/api/files", Some(&it)).await;
    assert_eq!(status, StatusCode::OK, "{list}");
    assert_eq!(list["data"]["total"], 1);
    assert_eq!(list["data"]["items"][0]["name"], "catalogo.pdf");

    let (status, _) = app
        .send(multipart_request(&it, &png_bytes(), "a.png", Some("news")))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
