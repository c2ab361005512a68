use axum::{extract::State, response::IntoResponse};

use crate::dto::auth_dto::{CreateUserPayload, LoginPayload, LoginResponse};
use crate::dto::envelope::{created, ok};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::services::auth_service::AuthService;
use crate::utils::extract::ApiJson;
use crate::AppState;

fn service(state: &AppState) -> Result<AuthService> {
    Ok(AuthService::new(state.store()?, state.config.clone()))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Signed session token", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 503, description = "Authentication is not configured")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.login(payload).await?))
}

pub async fn me(State(state): State<AppState>, claims: Claims) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.me(&claims).await?))
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.list_users().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    claims: Claims,
    ApiJson(payload): ApiJson<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = service(&state)?.create_user(payload).await?;
    tracing::info!(created_by = %claims.email, user_id = %user.id, "user created from dashboard");
    Ok(created(user))
}
