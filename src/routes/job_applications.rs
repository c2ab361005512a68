use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::dto::envelope::{created, ok};
use crate::dto::job_application_dto::{
    JobApplicationListQuery, JobApplicationPayload, JobApplicationReceipt,
    UpdateJobApplicationPayload,
};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::services::job_application_service::JobApplicationService;
use crate::utils::extract::{ApiJson, ApiQuery};
use crate::utils::request_meta::ClientInfo;
use crate::AppState;

fn service(state: &AppState) -> Result<JobApplicationService> {
    Ok(JobApplicationService::new(state.store()?, state.notifications()))
}

#[utoipa::path(
    post,
    path = "/api/job-applications",
    request_body = JobApplicationPayload,
    responses(
        (status = 201, description = "Application stored", body = JobApplicationReceipt),
        (status = 400, description = "Missing or invalid fields, or privacy policy not accepted"),
        (status = 429, description = "Too many submissions from this client")
    )
)]
pub async fn submit_application(
    State(state): State<AppState>,
    client: ClientInfo,
    ApiJson(payload): ApiJson<JobApplicationPayload>,
) -> Result<impl IntoResponse> {
    let record = service(&state)?.submit(payload, &client).await?;
    Ok(created(JobApplicationReceipt {
        id: record.id,
        status: record.data.status,
    }))
}

pub async fn list_applications(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<JobApplicationListQuery>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.list(query).await?))
}

pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.get(&id).await?))
}

pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
    client: ClientInfo,
    ApiJson(payload): ApiJson<UpdateJobApplicationPayload>,
) -> Result<impl IntoResponse> {
    let record = service(&state)?
        .update(&id, payload, &claims.email, &client)
        .await?;
    Ok(ok(record))
}
