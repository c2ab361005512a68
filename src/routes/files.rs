use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
};

use crate::dto::envelope::{created, ok, ok_with_message};
use crate::dto::file_dto::FileListQuery;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::services::file_service::{FileService, NewUpload};
use crate::utils::extract::ApiQuery;
use crate::utils::request_meta::ClientInfo;
use crate::AppState;

fn service(state: &AppState) -> Result<FileService> {
    Ok(FileService::new(state.store()?, state.config.max_upload_bytes))
}

fn media_service(state: &AppState) -> Result<FileService> {
    Ok(service(state)?.with_media(state.media()?))
}

/// Multipart upload: a `file` part plus optional `category` and `folder` text parts.
pub async fn upload_file(
    State(state): State<AppState>,
    claims: Claims,
    client: ClientInfo,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let service = media_service(&state)?;

    let mut file = None;
    let mut category = None;
    let mut folder = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("archivo").to_string();
                let data = field.bytes().await?;
                file = Some((file_name, data));
            }
            "category" => category = Some(field.text().await?),
            "folder" => folder = Some(field.text().await?),
            other => tracing::debug!(field = other, "ignoring unknown upload field"),
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| Error::BadRequest("No se recibió ningún archivo".into()))?;
    let record = service
        .upload(
            NewUpload {
                file_name,
                data,
                category,
                folder,
            },
            &claims.email,
            &client,
        )
        .await?;
    Ok(created(record))
}

pub async fn list_files(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FileListQuery>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.list(query).await?))
}

pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
    client: ClientInfo,
) -> Result<impl IntoResponse> {
    media_service(&state)?.delete(&id, &claims.email, &client).await?;
    Ok(ok_with_message(serde_json::json!({ "id": id }), "Archivo eliminado"))
}
