use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Sse,
    },
};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};

use crate::database::store::{ChangeEvent, ChangeKind};
use crate::dto::contact_dto::{ContactRequestListQuery, UpdateContactRequestPayload};
use crate::dto::envelope::ok;
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::contact_request;
use crate::services::contact_service::ContactService;
use crate::utils::extract::{ApiJson, ApiQuery};
use crate::utils::request_meta::ClientInfo;
use crate::AppState;

fn service(state: &AppState) -> Result<ContactService> {
    Ok(ContactService::new(state.store()?, state.notifications()))
}

pub async fn list_requests(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ContactRequestListQuery>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.list(query).await?))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(ok(service(&state)?.get(&id).await?))
}

pub async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
    client: ClientInfo,
    ApiJson(payload): ApiJson<UpdateContactRequestPayload>,
) -> Result<impl IntoResponse> {
    let record = service(&state)?
        .update(&id, payload, &claims.email, &client)
        .await?;
    Ok(ok(record))
}

fn to_sse(event: &ChangeEvent) -> Option<Event> {
    let name = match event.kind {
        ChangeKind::Created => "created",
        ChangeKind::Updated => "updated",
        ChangeKind::Deleted => "deleted",
    };
    match Event::default().event(name).id(event.id.clone()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode change event");
            None
        }
    }
}

/// Live feed of contact-request writes for the dashboards.
pub async fn stream_requests(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let receiver = state.store()?.subscribe();
    tracing::info!(user = %claims.sub, "contact request stream opened");

    let stream = BroadcastStream::new(receiver).filter_map(|message| match message {
        Ok(event) if event.collection == contact_request::COLLECTION => to_sse(&event).map(Ok),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "contact request stream lagged");
            None
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
