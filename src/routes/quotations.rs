use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::dto::envelope::{created, ok};
use crate::dto::quotation_dto::{CreateQuotationPayload, QuotationListQuery, UpdateQuotationPayload};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::services::quotation_service::QuotationService;
use crate::utils::extract::{ApiJson, ApiQuery};
use crate::utils::request_meta::ClientInfo;
use crate::AppState;

fn service(state: &AppState) -> Result<QuotationService> {
    Ok(QuotationService::new(state.store()?, state.notifications()))
}

pub async fn create_quotation(
    State(state): State<AppState>,
    claims: Claims,
    client: ClientInfo,
    ApiJson(payload): ApiJson<CreateQuotationPayload>,
) -> Result<impl IntoResponse> {
    let record = service(&state)?.create(payload, &claims.email, &client).await?;
    Ok(created(record))
}

pub async fn list_quotations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<QuotationListQuery>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.list(query).await?))
}

pub async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.get(&id).await?))
}

pub async fn update_quotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
    client: ClientInfo,
    ApiJson(payload): ApiJson<UpdateQuotationPayload>,
) -> Result<impl IntoResponse> {
    let record = service(&state)?
        .update(&id, payload, &claims.email, &client)
        .await?;
    Ok(ok(record))
}
