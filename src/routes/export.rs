use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::error::Result;
use crate::services::contact_service::ContactService;
use crate::services::export_service::{ExportService, XLSX_CONTENT_TYPE};
use crate::services::job_application_service::JobApplicationService;
use crate::utils::extract::ApiQuery;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportQuery {
    pub status: Option<String>,
}

fn xlsx_response(buffer: Vec<u8>, prefix: &str) -> impl IntoResponse {
    let filename = format!("{}_{}.xlsx", prefix, chrono::Utc::now().format("%Y%m%d"));
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    )
}

/// Export contact requests as XLSX, optionally filtered by status.
pub async fn export_requests(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> Result<impl IntoResponse> {
    let requests = ContactService::new(state.store()?, state.notifications())
        .all(query.status.as_deref())
        .await?;
    let buffer = ExportService::contact_requests_xlsx(&requests)?;
    tracing::info!(rows = requests.len(), "contact requests exported");
    Ok(xlsx_response(buffer, "solicitudes"))
}

/// Export job applications as XLSX, optionally filtered by status.
pub async fn export_applications(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> Result<impl IntoResponse> {
    let applications = JobApplicationService::new(state.store()?, state.notifications())
        .all(query.status.as_deref())
        .await?;
    let buffer = ExportService::job_applications_xlsx(&applications)?;
    tracing::info!(rows = applications.len(), "job applications exported");
    Ok(xlsx_response(buffer, "postulaciones"))
}
