use axum::{extract::State, response::IntoResponse};

use crate::dto::dashboard_dto::IntegrationStatus;
use crate::dto::envelope::ok;
use crate::error::Result;
use crate::services::stats_service::StatsService;
use crate::AppState;

pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(ok(StatsService::new(state.store()?).dashboard().await?))
}

/// Which integrations are wired up. Secrets are never echoed back.
pub async fn debug_env(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    ok(IntegrationStatus {
        app_env: config.app_env.clone(),
        database: state.store.is_some(),
        auth: config.jwt_secret.is_some(),
        email: config.email.is_some(),
        media: state.media.is_some(),
        email_sender: config.email.as_ref().map(|e| e.sender_email.clone()),
        media_cloud_name: config.media.as_ref().map(|m| m.cloud_name.clone()),
        public_rps: config.public_rps,
        max_upload_bytes: config.max_upload_bytes,
    })
}
