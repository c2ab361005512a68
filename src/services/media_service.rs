use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::MediaSettings;
use crate::dto::file_dto::UploadedMedia;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: String,
    /// Folder below the configured base folder.
    pub folder: String,
    pub resource_type: &'static str,
}

/// External binary storage. Only metadata is kept in the document store.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia>;

    async fn destroy(&self, public_id: &str, resource_type: &str) -> Result<()>;

    /// Delivery URL for an image with an optional transformation such as `w_400,c_fill`.
    fn transform_url(&self, public_id: &str, transformation: Option<&str>) -> String;
}

/// Cloudinary-compatible signed uploads.
pub struct CloudinaryHost {
    client: Client,
    settings: MediaSettings,
    api_base: String,
    delivery_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    resource_type: String,
    bytes: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

impl CloudinaryHost {
    pub fn new(settings: MediaSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client for media: {}", e)))?;
        info!(cloud = %settings.cloud_name, folder = %settings.base_folder, "Media host enabled");
        Ok(Self {
            client,
            api_base: format!("https://api.cloudinary.com/v1_1/{}", settings.cloud_name),
            delivery_base: format!("https://res.cloudinary.com/{}", settings.cloud_name),
            settings,
        })
    }

    pub fn full_folder(&self, folder: &str) -> String {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            self.settings.base_folder.clone()
        } else {
            format!("{}/{}", self.settings.base_folder, folder)
        }
    }

    fn signed_params(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        params.insert("timestamp", timestamp);
        let signature = sign(&params, &self.settings.api_secret);
        params.insert("signature", signature);
        params.insert("signature_algorithm", "sha256".to_string());
        params.insert("api_key", self.settings.api_key.clone());
        params
    }
}

/// Hex SHA-256 of the sorted `key=value` pairs joined by `&`, followed by the secret.
pub fn sign(params: &BTreeMap<&'static str, String>, secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia> {
        let mut params = BTreeMap::new();
        params.insert("folder", self.full_folder(&upload.folder));
        let params = self.signed_params(params);

        let file_part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| Error::BadRequest(format!("Tipo de archivo inválido: {}", e)))?;
        let mut form = multipart::Form::new().part("file", file_part);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = format!("{}/{}/upload", self.api_base, upload.resource_type);
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Internal(format!(
                "Media upload responded with {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(UploadedMedia {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
            resource_type: uploaded.resource_type,
            bytes: uploaded.bytes,
        })
    }

    async fn destroy(&self, public_id: &str, resource_type: &str) -> Result<()> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        let params = self.signed_params(params);

        let url = format!("{}/{}/destroy", self.api_base, resource_type);
        let response = self.client.post(url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Internal(format!(
                "Media destroy responded with {}: {}",
                status, body
            )));
        }

        let destroyed: DestroyResponse = response.json().await?;
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(Error::Internal(format!("Media destroy returned {}", other))),
        }
    }

    fn transform_url(&self, public_id: &str, transformation: Option<&str>) -> String {
        match transformation.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => format!("{}/image/upload/{}/{}", self.delivery_base, t, public_id),
            None => format!("{}/image/upload/{}", self.delivery_base, public_id),
        }
    }
}
