use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value as JsonValue};
use tracing::info;
use validator::Validate;

use crate::database::collection::{Collection, Page, Record};
use crate::database::store::{DocumentQuery, DocumentStore};
use crate::dto::contact_dto::{ContactPayload, ContactRequestListQuery, UpdateContactRequestPayload};
use crate::error::{Error, Result};
use crate::models::contact_request::{self, ContactRequest, DEFAULT_SOURCE, TRACKING_PREFIX};
use crate::models::status::{ensure_transition, parse_status_filter, ContactStatus, StatusChange, Workflow};
use crate::services::activity_service::ActivityService;
use crate::services::notification_service::NotificationService;
use crate::utils::request_meta::ClientInfo;
use crate::utils::token::generate_tracking_id;
use crate::utils::validation::{ensure_email, ensure_phone, RequiredFields};

pub const NOT_FOUND: &str = "Solicitud no encontrada";
const ENTITY: &str = "contact_request";

/// Validates a public submission and builds the record to store.
pub fn build_contact_request(
    payload: ContactPayload,
    client: &ClientInfo,
    now: DateTime<Utc>,
) -> Result<ContactRequest> {
    RequiredFields::new()
        .check("nombre", &payload.contact_name)
        .check("email", &payload.email)
        .check("teléfono", &payload.phone)
        .check("descripción", &payload.description)
        .finish()?;
    payload.validate()?;

    let email = payload.email.unwrap_or_default();
    let phone = payload.phone.unwrap_or_default();
    ensure_email(&email)?;
    ensure_phone(&phone)?;

    Ok(ContactRequest {
        tracking_id: generate_tracking_id(TRACKING_PREFIX, now),
        company_name: payload.company_name,
        contact_name: payload.contact_name.unwrap_or_default(),
        email,
        phone,
        branch_id: payload.branch_id,
        location: payload.location,
        budget: payload.budget,
        request_type: payload.request_type.unwrap_or_default(),
        description: payload.description.unwrap_or_default(),
        newsletter: payload.newsletter.unwrap_or(false),
        status: ContactStatus::initial(),
        source: payload.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        ip_address: client.ip_address.clone(),
        user_agent: client.user_agent.clone(),
        assigned_to: None,
        notes: None,
        status_history: Vec::new(),
    })
}

#[derive(Clone)]
pub struct ContactService {
    requests: Collection<ContactRequest>,
    activity: ActivityService,
    notifications: NotificationService,
}

impl ContactService {
    pub fn new(store: Arc<dyn DocumentStore>, notifications: NotificationService) -> Self {
        Self {
            requests: Collection::new(store.clone(), contact_request::COLLECTION),
            activity: ActivityService::new(store),
            notifications,
        }
    }

    pub async fn submit(&self, payload: ContactPayload, client: &ClientInfo) -> Result<Record<ContactRequest>> {
        let request = build_contact_request(payload, client, Utc::now())?;
        let record = self.requests.insert(&request).await?;
        info!(id = %record.id, tracking_id = %record.data.tracking_id, "contact request received");

        self.activity
            .log(
                None,
                "created",
                ENTITY,
                &record.id,
                Some(json!({ "tracking_id": record.data.tracking_id, "source": record.data.source })),
                client,
            )
            .await;
        self.notifications.contact_received(&record).await;

        Ok(record)
    }

    pub async fn list(&self, query: ContactRequestListQuery) -> Result<Page<ContactRequest>> {
        let status = parse_status_filter::<ContactStatus>(query.status.as_deref())?;
        let filter = DocumentQuery::new()
            .eq_opt("status", status.map(|s| s.as_str()))
            .eq_opt("branch_id", query.branch_id)
            .eq_opt("assigned_to", query.assigned_to);
        self.requests.page(filter, query.page, query.per_page).await
    }

    pub async fn all(&self, status: Option<&str>) -> Result<Vec<Record<ContactRequest>>> {
        let status = parse_status_filter::<ContactStatus>(status)?;
        self.requests
            .find(&DocumentQuery::new().eq_opt("status", status.map(|s| s.as_str())))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Record<ContactRequest>> {
        self.requests.require(id, NOT_FOUND).await
    }

    /// Applies a dashboard update. Assigning a pending request without an
    /// explicit status moves it to `asignada`.
    pub async fn update(
        &self,
        id: &str,
        payload: UpdateContactRequestPayload,
        actor: &str,
        client: &ClientInfo,
    ) -> Result<Record<ContactRequest>> {
        payload.validate()?;
        let current = self.get(id).await?;
        let from = current.data.status;

        let target = match payload.status {
            Some(status) => Some(status),
            None if payload.assigned_to.is_some() && from == ContactStatus::Pendiente => {
                Some(ContactStatus::Asignada)
            }
            None => None,
        };

        let mut patch = Map::new();
        let mut changed_to = None;
        if let Some(to) = target {
            if ensure_transition(from, to)? {
                let mut history = current.data.status_history.clone();
                history.push(StatusChange {
                    from,
                    to,
                    changed_by: Some(actor.to_string()),
                    changed_at: Utc::now(),
                });
                patch.insert("status".into(), json!(to));
                patch.insert("status_history".into(), serde_json::to_value(&history)?);
                changed_to = Some(to);
            }
        }
        if let Some(assigned_to) = &payload.assigned_to {
            patch.insert("assigned_to".into(), JsonValue::String(assigned_to.clone()));
        }
        if let Some(notes) = &payload.notes {
            patch.insert("notes".into(), JsonValue::String(notes.clone()));
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self
            .requests
            .patch(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(NOT_FOUND.into()))?;

        if let Some(to) = changed_to {
            info!(id, from = %from, to = %to, actor, "contact request status changed");
        }
        self.activity
            .log(
                Some(actor),
                if changed_to.is_some() { "status_changed" } else { "updated" },
                ENTITY,
                id,
                Some(json!({
                    "from": from,
                    "to": changed_to,
                    "assigned_to": payload.assigned_to,
                    "notes_updated": payload.notes.is_some(),
                })),
                client,
            )
            .await;

        Ok(updated)
    }
}
