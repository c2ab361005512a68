use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::database::collection::{Collection, Page, Record};
use crate::database::store::{DocumentQuery, DocumentStore};
use crate::dto::file_dto::FileListQuery;
use crate::error::{Error, Result};
use crate::models::file_record::{self, FileCategory, FileRecord};
use crate::services::activity_service::ActivityService;
use crate::services::media_service::{MediaHost, MediaUpload};
use crate::utils::request_meta::ClientInfo;

pub const NOT_FOUND: &str = "Archivo no encontrado";
pub const THUMBNAIL: &str = "c_fill,w_400,h_400";

/// Kinds accepted for upload, identified by content rather than by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Jpeg,
    Png,
    Webp,
    Gif,
    Pdf,
}

impl FileKind {
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(FileKind::Jpeg)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(FileKind::Png)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(FileKind::Webp)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(FileKind::Gif)
        } else if data.starts_with(b"%PDF") {
            Some(FileKind::Pdf)
        } else {
            None
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            FileKind::Jpeg => "image/jpeg",
            FileKind::Png => "image/png",
            FileKind::Webp => "image/webp",
            FileKind::Gif => "image/gif",
            FileKind::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Jpeg => "jpg",
            FileKind::Png => "png",
            FileKind::Webp => "webp",
            FileKind::Gif => "gif",
            FileKind::Pdf => "pdf",
        }
    }

    /// Media host resource type; PDFs are stored as raw files.
    pub fn resource_type(self) -> &'static str {
        match self {
            FileKind::Pdf => "raw",
            _ => "image",
        }
    }
}

/// Keeps the file stem readable and safe for the media host.
pub fn safe_file_name(original: &str, kind: FileKind) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("archivo");
    let mut cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c.to_ascii_lowercase() } else { '_' })
        .take(80)
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        cleaned = "archivo".to_string();
    }
    format!("{}.{}", cleaned, kind.extension())
}

/// Folder names are limited to a single safe path segment.
fn clean_folder(folder: Option<&str>) -> Result<Option<String>> {
    let Some(folder) = folder.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    let valid = folder.len() <= 60
        && folder
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(Some(folder.to_ascii_lowercase()))
    } else {
        Err(Error::BadRequest("Nombre de carpeta inválido".into()))
    }
}

pub struct NewUpload {
    pub file_name: String,
    pub data: Bytes,
    pub category: Option<String>,
    pub folder: Option<String>,
}

#[derive(Clone)]
pub struct FileService {
    files: Collection<FileRecord>,
    media: Option<Arc<dyn MediaHost>>,
    activity: ActivityService,
    max_bytes: usize,
}

impl FileService {
    /// Listing needs only the store; uploads and deletes also need `with_media`.
    pub fn new(store: Arc<dyn DocumentStore>, max_bytes: usize) -> Self {
        Self {
            files: Collection::new(store.clone(), file_record::COLLECTION),
            media: None,
            activity: ActivityService::new(store),
            max_bytes,
        }
    }

    pub fn with_media(mut self, media: Arc<dyn MediaHost>) -> Self {
        self.media = Some(media);
        self
    }

    fn media(&self) -> Result<&Arc<dyn MediaHost>> {
        self.media
            .as_ref()
            .ok_or_else(|| Error::unavailable("almacenamiento de archivos"))
    }

    pub async fn upload(&self, upload: NewUpload, actor: &str, client: &ClientInfo) -> Result<Record<FileRecord>> {
        let media = self.media()?;
        let category_raw = upload
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::BadRequest("Faltan campos requeridos: categoría".into()))?;
        let category = FileCategory::parse(category_raw)
            .ok_or_else(|| Error::BadRequest(format!("Categoría inválida: {}", category_raw)))?;
        if upload.data.is_empty() {
            return Err(Error::BadRequest("El archivo está vacío".into()));
        }
        if upload.data.len() > self.max_bytes {
            return Err(Error::BadRequest(format!(
                "El archivo excede el tamaño máximo de {} MB",
                self.max_bytes / (1024 * 1024)
            )));
        }
        let kind = FileKind::sniff(&upload.data).ok_or_else(|| {
            Error::BadRequest("Tipo de archivo no permitido: se aceptan JPG, PNG, WEBP, GIF y PDF".into())
        })?;

        let sub_folder = clean_folder(upload.folder.as_deref())?;
        let folder = match &sub_folder {
            Some(sub) => format!("{}/{}", category.as_str(), sub),
            None => category.as_str().to_string(),
        };
        let name = safe_file_name(&upload.file_name, kind);
        let size = upload.data.len() as u64;

        let uploaded = media
            .upload(MediaUpload {
                bytes: upload.data,
                file_name: name.clone(),
                content_type: kind.content_type().to_string(),
                folder: folder.clone(),
                resource_type: kind.resource_type(),
            })
            .await?;

        let thumbnail_url = (kind.resource_type() == "image")
            .then(|| media.transform_url(&uploaded.public_id, Some(THUMBNAIL)));
        let record = FileRecord {
            name,
            size: uploaded.bytes.unwrap_or(size),
            content_type: kind.content_type().to_string(),
            url: uploaded.url,
            public_id: uploaded.public_id,
            resource_type: uploaded.resource_type,
            folder,
            category,
            uploaded_by: actor.to_string(),
            thumbnail_url,
        };
        let saved = match self.files.insert(&record).await {
            Ok(saved) => saved,
            Err(err) => {
                if let Err(cleanup) = media.destroy(&record.public_id, &record.resource_type).await {
                    warn!(public_id = %record.public_id, error = %cleanup, "could not remove orphaned upload");
                }
                return Err(err);
            }
        };
        info!(id = %saved.id, public_id = %saved.data.public_id, size = saved.data.size, "file uploaded");
        self.activity
            .log(Some(actor), "uploaded", "file", &saved.id, None, client)
            .await;
        Ok(saved)
    }

    pub async fn list(&self, query: FileListQuery) -> Result<Page<FileRecord>> {
        let category = match query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(raw) => Some(
                FileCategory::parse(raw)
                    .ok_or_else(|| Error::BadRequest(format!("Categoría inválida: {}", raw)))?,
            ),
            None => None,
        };
        let filter = DocumentQuery::new().eq_opt("category", category.map(FileCategory::as_str));
        self.files.page(filter, query.page, query.per_page).await
    }

    /// Removes the binary from the media host first, then the record.
    pub async fn delete(&self, id: &str, actor: &str, client: &ClientInfo) -> Result<()> {
        let media = self.media()?;
        let record = self.files.require(id, NOT_FOUND).await?;
        media
            .destroy(&record.data.public_id, &record.data.resource_type)
            .await?;
        self.files.delete(id).await?;
        info!(id, public_id = %record.data.public_id, actor, "file deleted");
        self.activity
            .log(Some(actor), "deleted", "file", id, None, client)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Map, Value as JsonValue};
    use tokio::sync::broadcast;

    use crate::database::memory::MemoryDocumentStore;
    use crate::database::store::{ChangeEvent, Document, StoreError, StoreResult};
    use crate::dto::file_dto::UploadedMedia;
    use std::sync::Mutex;

    /// Accepts reads but refuses every insert.
    struct InsertFailsStore;

    #[async_trait]
    impl DocumentStore for InsertFailsStore {
        async fn insert(&self, _collection: &str, _data: JsonValue) -> StoreResult<Document> {
            Err(StoreError::Unavailable("disk full".into()))
        }

        async fn get(&self, _collection: &str, _id: &str) -> StoreResult<Option<Document>> {
            Ok(None)
        }

        async fn update(
            &self,
            _collection: &str,
            _id: &str,
            _patch: Map<String, JsonValue>,
        ) -> StoreResult<Option<Document>> {
            Ok(None)
        }

        async fn delete(&self, _collection: &str, _id: &str) -> StoreResult<bool> {
            Ok(false)
        }

        async fn find(&self, _collection: &str, _query: &DocumentQuery) -> StoreResult<Vec<Document>> {
            Ok(Vec::new())
        }

        async fn count(&self, _collection: &str, _query: &DocumentQuery) -> StoreResult<i64> {
            Ok(0)
        }

        fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
            broadcast::channel(1).1
        }
    }

    fn png_upload() -> NewUpload {
        NewUpload {
            file_name: "logo.png".into(),
            data: Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
            category: Some("brands".into()),
            folder: None,
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        destroyed: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl MediaHost for RecordingHost {
        async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia> {
            Ok(UploadedMedia {
                url: format!("https://media.test/{}", upload.file_name),
                public_id: format!("ferreteria/{}/logo", upload.folder),
                resource_type: upload.resource_type.to_string(),
                bytes: Some(upload.bytes.len() as u64),
            })
        }

        async fn destroy(&self, public_id: &str, resource_type: &str) -> Result<()> {
            self.destroyed
                .lock()
                .unwrap()
                .push((public_id.to_string(), resource_type.to_string()));
            Ok(())
        }

        fn transform_url(&self, public_id: &str, transformation: Option<&str>) -> String {
            format!("https://media.test/{}/{}", transformation.unwrap_or("original"), public_id)
        }
    }

    #[tokio::test]
    async fn failed_insert_removes_the_hosted_file() {
        let media = Arc::new(RecordingHost::default());
        let service = FileService::new(Arc::new(InsertFailsStore), 1024).with_media(media.clone());
        let err = service
            .upload(png_upload(), "it@ferreteria.mx", &ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Unavailable(_))));
        assert_eq!(
            *media.destroyed.lock().unwrap(),
            vec![("ferreteria/brands/logo".to_string(), "image".to_string())]
        );
    }

    #[tokio::test]
    async fn images_get_a_thumbnail_url() {
        let media = Arc::new(RecordingHost::default());
        let service = FileService::new(Arc::new(MemoryDocumentStore::new()), 1024)
            .with_media(media.clone());
        let saved = service
            .upload(png_upload(), "it@ferreteria.mx", &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(
            saved.data.thumbnail_url.as_deref(),
            Some("https://media.test/c_fill,w_400,h_400/ferreteria/brands/logo")
        );
        assert!(media.destroyed.lock().unwrap().is_empty());

        let mut pdf = png_upload();
        pdf.data = Bytes::from_static(b"%PDF-1.7\n");
        pdf.category = Some("documents".into());
        let saved = service
            .upload(pdf, "it@ferreteria.mx", &ClientInfo::default())
            .await
            .unwrap();
        assert!(saved.data.thumbnail_url.is_none());
    }

    #[tokio::test]
    async fn listing_works_without_a_media_host() {
        let service = FileService::new(Arc::new(MemoryDocumentStore::new()), 1024);
        let page = service.list(FileListQuery::default()).await.unwrap();
        assert_eq!(page.total, 0);
        let err = service
            .upload(png_upload(), "it@ferreteria.mx", &ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[test]
    fn sniffing_uses_magic_bytes() {
        assert_eq!(FileKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0]), Some(FileKind::Jpeg));
        assert_eq!(FileKind::sniff(b"%PDF-1.7\n"), Some(FileKind::Pdf));
        assert_eq!(FileKind::sniff(b"GIF89a...."), Some(FileKind::Gif));
        assert_eq!(FileKind::sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some(FileKind::Webp));
        assert_eq!(FileKind::sniff(b"MZ\x90\x00"), None);
        assert_eq!(FileKind::sniff(b"<svg></svg>"), None);
    }

    #[test]
    fn file_names_are_normalized_to_the_sniffed_kind() {
        assert_eq!(safe_file_name("Logo Truper.PNG", FileKind::Png), "logo_truper.png");
        assert_eq!(safe_file_name("../../etc/passwd", FileKind::Pdf), "passwd.pdf");
        assert_eq!(safe_file_name("", FileKind::Jpeg), "archivo.jpg");
    }

    #[test]
    fn folders_are_single_segments() {
        assert_eq!(clean_folder(Some("Buen-Fin")).unwrap().as_deref(), Some("buen-fin"));
        assert!(clean_folder(Some("../secret")).is_err());
        assert_eq!(clean_folder(Some("  ")).unwrap(), None);
    }
}
