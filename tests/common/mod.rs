#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use ferreteria_backend::{
    config::{Config, EmailSettings},
    database::{collection::Collection, memory::MemoryDocumentStore, store::DocumentStore},
    dto::file_dto::UploadedMedia,
    error::{Error, Result},
    models::user::{self, Role, User},
    routes,
    services::{
        auth_service::issue_token,
        email_service::{EmailMessage, EmailTemplate, Mailer},
        media_service::{MediaHost, MediaUpload},
    },
    utils::crypto::hash_password,
    AppState,
};

pub const JWT_SECRET: &str = "test_secret_key";
pub const PROXY_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

/// Records every message; optionally fails each send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn templates(&self) -> Vec<EmailTemplate> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.template)
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, message: EmailMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message);
        if self.fail {
            Err(Error::Internal("provider down".into()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct FakeMediaHost {
    pub uploaded: Mutex<Vec<String>>,
    pub destroyed: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia> {
        let public_id = format!("{}/{}", upload.folder, upload.file_name);
        self.uploaded.lock().unwrap().push(public_id.clone());
        Ok(UploadedMedia {
            url: format!("https://media.test/{}", public_id),
            public_id,
            resource_type: upload.resource_type.to_string(),
            bytes: Some(upload.bytes.len() as u64),
        })
    }

    async fn destroy(&self, public_id: &str, _resource_type: &str) -> Result<()> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }

    fn transform_url(&self, public_id: &str, transformation: Option<&str>) -> String {
        match transformation {
            Some(t) => format!("https://media.test/{}/{}", t, public_id),
            None => format!("https://media.test/{}", public_id),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        jwt_secret: Some(JWT_SECRET.to_string()),
        public_rps: 1000,
        max_upload_bytes: 1024 * 1024,
        trusted_proxies: vec![PROXY_IP],
        email: Some(EmailSettings {
            api_key: "test-key".into(),
            api_url: "http://127.0.0.1:9/unused".into(),
            sender_email: "no-reply@ferreteria.test".into(),
            sender_name: "Ferretería".into(),
            notify_to: vec!["ventas@ferreteria.test".into()],
            hr_notify_to: vec!["rh@ferreteria.test".into()],
            templates: HashMap::new(),
        }),
        ..Config::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<dyn DocumentStore>,
    pub mailer: Arc<RecordingMailer>,
    pub media: Arc<FakeMediaHost>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(config, RecordingMailer::default())
    }

    pub fn with_failing_mailer() -> Self {
        Self::build(test_config(), RecordingMailer::failing())
    }

    fn build(config: Config, mailer: RecordingMailer) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let mailer = Arc::new(mailer);
        let media = Arc::new(FakeMediaHost::default());
        let state = AppState::new(config, Some(store.clone()))
            .expect("state")
            .with_mailer(mailer.clone())
            .with_media(media.clone());

        Self {
            router: routes::router(state.clone()),
            state,
            store,
            mailer,
            media,
        }
    }

    pub async fn seed_user(&self, email: &str, role: Role) -> String {
        let users: Collection<User> = Collection::new(self.store.clone(), user::COLLECTION);
        let record = users
            .insert(&User {
                email: email.to_string(),
                name: format!("Usuario {}", role),
                role,
                password_hash: hash_password("secreto123").expect("hash"),
                active: true,
            })
            .await
            .expect("seed user");
        record.id
    }

    /// Seeds a user with the given role and returns a bearer token for it.
    pub async fn token_for(&self, role: Role) -> String {
        let email = format!("{}@ferreteria.test", role);
        let id = self.seed_user(&email, role).await;
        let user = User {
            email,
            name: String::new(),
            role,
            password_hash: String::new(),
            active: true,
        };
        issue_token(JWT_SECRET, &id, &user, 1).expect("token").0
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, JsonValue) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, JsonValue) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: JsonValue,
    ) -> (StatusCode, JsonValue) {
        self.send(request(method, uri, token, Some(body))).await
    }
}

/// Every submitted field must come back unchanged.
pub fn assert_fields_match(sent: &JsonValue, stored: &JsonValue) {
    for (key, value) in sent.as_object().expect("object body") {
        assert_eq!(&stored[key], value, "field `{}` changed on the way through", key);
    }
}

/// Request arriving through the trusted proxy on behalf of 203.0.113.7.
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<JsonValue>) -> Request<Body> {
    request_from(PROXY_IP, method, uri, token, body)
}

/// Request whose socket peer is `peer`; always carries a forwarded header.
pub fn request_from(
    peer: IpAddr,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::new(peer, 40_000)))
        .header("x-forwarded-for", "203.0.113.7");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
