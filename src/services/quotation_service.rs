use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value as JsonValue};
use tracing::info;
use validator::Validate;

use crate::database::collection::{Collection, Page, Record};
use crate::database::store::{DocumentQuery, DocumentStore};
use crate::dto::quotation_dto::{
    CreateQuotationPayload, QuotationItemPayload, QuotationListQuery, UpdateQuotationPayload,
    MAX_QUOTATION_ITEMS,
};
use crate::error::{Error, Result};
use crate::models::contact_request::{self, ContactRequest};
use crate::models::quotation::{self, totals, Quotation, QuotationItem};
use crate::models::status::{
    ensure_transition, parse_status_filter, QuotationStatus, StatusChange, Workflow,
};
use crate::services::activity_service::ActivityService;
use crate::services::notification_service::NotificationService;
use crate::utils::request_meta::ClientInfo;
use crate::utils::token::generate_tracking_id;
use crate::utils::validation::{ensure_email, ensure_phone, RequiredFields};

pub const NOT_FOUND: &str = "Cotización no encontrada";
pub const FOLIO_PREFIX: &str = "COT";
const ENTITY: &str = "quotation";

/// Mexican IVA.
pub fn tax_rate() -> Decimal {
    Decimal::new(16, 2)
}

fn priced(items: &[QuotationItem]) -> Result<(Decimal, Decimal, Decimal)> {
    totals(items, tax_rate())
        .ok_or_else(|| Error::BadRequest("El importe total de la cotización está fuera de rango".into()))
}

pub fn build_items(items: Vec<QuotationItemPayload>) -> Result<Vec<QuotationItem>> {
    if items.is_empty() {
        return Err(Error::BadRequest(
            "La cotización debe incluir al menos un artículo".into(),
        ));
    }
    if items.len() > MAX_QUOTATION_ITEMS {
        return Err(Error::BadRequest(format!(
            "La cotización no puede tener más de {} artículos",
            MAX_QUOTATION_ITEMS
        )));
    }
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let n = idx + 1;
            let (Some(description), Some(quantity), Some(unit_price)) =
                (item.description, item.quantity, item.unit_price)
            else {
                return Err(Error::BadRequest(format!(
                    "Artículo {}: se requieren descripción, cantidad y precio unitario",
                    n
                )));
            };
            if quantity <= Decimal::ZERO {
                return Err(Error::BadRequest(format!(
                    "Artículo {}: la cantidad debe ser mayor a cero",
                    n
                )));
            }
            if unit_price < Decimal::ZERO {
                return Err(Error::BadRequest(format!(
                    "Artículo {}: el precio unitario no puede ser negativo",
                    n
                )));
            }
            let item = QuotationItem {
                description,
                sku: item.sku,
                quantity,
                unit_price,
            };
            if item.line_total().is_none() {
                return Err(Error::BadRequest(format!(
                    "Artículo {}: importe fuera de rango",
                    n
                )));
            }
            Ok(item)
        })
        .collect()
}

#[derive(Clone)]
pub struct QuotationService {
    quotations: Collection<Quotation>,
    requests: Collection<ContactRequest>,
    activity: ActivityService,
    notifications: NotificationService,
}

impl QuotationService {
    pub fn new(store: Arc<dyn DocumentStore>, notifications: NotificationService) -> Self {
        Self {
            quotations: Collection::new(store.clone(), quotation::COLLECTION),
            requests: Collection::new(store.clone(), contact_request::COLLECTION),
            activity: ActivityService::new(store),
            notifications,
        }
    }

    /// Creates a draft. Customer fields left out are copied from the linked contact request.
    pub async fn create(
        &self,
        mut payload: CreateQuotationPayload,
        actor: &str,
        client: &ClientInfo,
    ) -> Result<Record<Quotation>> {
        payload.validate()?;
        if let Some(request_id) = payload.request_id.clone() {
            let request = self
                .requests
                .require(&request_id, crate::services::contact_service::NOT_FOUND)
                .await?
                .data;
            payload.customer_name.get_or_insert(request.contact_name);
            payload.customer_email.get_or_insert(request.email);
            payload.customer_phone.get_or_insert(request.phone);
            if payload.branch_id.is_none() {
                payload.branch_id = request.branch_id;
            }
        }

        RequiredFields::new()
            .check("cliente", &payload.customer_name)
            .check("email del cliente", &payload.customer_email)
            .check("artículos", &payload.items)
            .finish()?;
        let customer_email = payload.customer_email.unwrap_or_default();
        ensure_email(&customer_email)?;
        if let Some(phone) = &payload.customer_phone {
            ensure_phone(phone)?;
        }
        if let Some(valid_until) = payload.valid_until {
            if valid_until < Utc::now().date_naive() {
                return Err(Error::BadRequest("La vigencia no puede estar en el pasado".into()));
            }
        }

        let items = build_items(payload.items.unwrap_or_default())?;
        let (subtotal, tax, total) = priced(&items)?;
        let quotation = Quotation {
            folio: generate_tracking_id(FOLIO_PREFIX, Utc::now()),
            request_id: payload.request_id,
            customer_name: payload.customer_name.unwrap_or_default(),
            customer_email,
            customer_phone: payload.customer_phone,
            branch_id: payload.branch_id,
            items,
            subtotal,
            tax,
            total,
            notes: payload.notes,
            valid_until: payload.valid_until,
            status: QuotationStatus::initial(),
            created_by: actor.to_string(),
            status_history: Vec::new(),
        };

        let record = self.quotations.insert(&quotation).await?;
        info!(id = %record.id, folio = %record.data.folio, total = %record.data.total, "quotation created");
        self.activity
            .log(
                Some(actor),
                "created",
                ENTITY,
                &record.id,
                Some(json!({ "folio": record.data.folio, "total": record.data.total })),
                client,
            )
            .await;
        Ok(record)
    }

    pub async fn list(&self, query: QuotationListQuery) -> Result<Page<Quotation>> {
        let status = parse_status_filter::<QuotationStatus>(query.status.as_deref())?;
        let filter = DocumentQuery::new()
            .eq_opt("status", status.map(|s| s.as_str()))
            .eq_opt("request_id", query.request_id);
        self.quotations.page(filter, query.page, query.per_page).await
    }

    pub async fn get(&self, id: &str) -> Result<Record<Quotation>> {
        self.quotations.require(id, NOT_FOUND).await
    }

    pub async fn update(
        &self,
        id: &str,
        payload: UpdateQuotationPayload,
        actor: &str,
        client: &ClientInfo,
    ) -> Result<Record<Quotation>> {
        payload.validate()?;
        let current = self.get(id).await?;
        let from = current.data.status;

        let mut patch = Map::new();
        if payload.items.is_some() || payload.valid_until.is_some() {
            if from != QuotationStatus::Borrador {
                return Err(Error::BadRequest(
                    "Solo se pueden editar cotizaciones en borrador".into(),
                ));
            }
            if let Some(items) = payload.items {
                let items = build_items(items)?;
                let (subtotal, tax, total) = priced(&items)?;
                patch.insert("items".into(), serde_json::to_value(&items)?);
                patch.insert("subtotal".into(), serde_json::to_value(subtotal)?);
                patch.insert("tax".into(), serde_json::to_value(tax)?);
                patch.insert("total".into(), serde_json::to_value(total)?);
            }
            if let Some(valid_until) = payload.valid_until {
                patch.insert("valid_until".into(), serde_json::to_value(valid_until)?);
            }
        }

        let mut changed_to = None;
        if let Some(to) = payload.status {
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
        if let Some(notes) = &payload.notes {
            patch.insert("notes".into(), JsonValue::String(notes.clone()));
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self
            .quotations
            .patch(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(NOT_FOUND.into()))?;

        if let Some(to) = changed_to {
            info!(id, from = %from, to = %to, actor, "quotation status changed");
            if to == QuotationStatus::Enviada {
                self.notifications.quotation_sent(&updated).await;
            }
        }
        self.activity
            .log(
                Some(actor),
                if changed_to.is_some() { "status_changed" } else { "updated" },
                ENTITY,
                id,
                Some(json!({ "from": from, "to": changed_to })),
                client,
            )
            .await;

        Ok(updated)
    }
}
