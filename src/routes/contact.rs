use axum::{extract::State, response::IntoResponse};

use crate::dto::contact_dto::{ContactPayload, ContactReceipt};
use crate::dto::envelope::ok_with_message;
use crate::error::Result;
use crate::services::contact_service::ContactService;
use crate::utils::{extract::ApiJson, request_meta::ClientInfo};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactPayload,
    responses(
        (status = 200, description = "Request stored; emails are best-effort", body = ContactReceipt),
        (status = 400, description = "Missing or invalid fields"),
        (status = 429, description = "Too many submissions from this client"),
        (status = 503, description = "Database not configured")
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    client: ClientInfo,
    ApiJson(payload): ApiJson<ContactPayload>,
) -> Result<impl IntoResponse> {
    let service = ContactService::new(state.store()?, state.notifications());
    let record = service.submit(payload, &client).await?;
    let receipt = ContactReceipt {
        id: record.id,
        tracking_id: record.data.tracking_id,
        status: record.data.status,
    };
    Ok(ok_with_message(
        receipt,
        "Solicitud recibida. Te contactaremos pronto.",
    ))
}
