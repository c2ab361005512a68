use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value as JsonValue};
use tracing::info;
use validator::Validate;

use crate::database::collection::{Collection, Page, Record};
use crate::database::store::{DocumentQuery, DocumentStore};
use crate::dto::job_application_dto::{
    JobApplicationListQuery, JobApplicationPayload, UpdateJobApplicationPayload,
};
use crate::error::{Error, Result};
use crate::models::catalog::{CatalogEntity, JobPosting};
use crate::models::job_application::{self, JobApplication};
use crate::models::status::{
    ensure_transition, parse_status_filter, ApplicationStatus, StatusChange, Workflow,
};
use crate::services::activity_service::ActivityService;
use crate::services::notification_service::NotificationService;
use crate::utils::request_meta::ClientInfo;
use crate::utils::validation::{ensure_email, ensure_phone, ensure_url, RequiredFields};

pub const NOT_FOUND: &str = "Postulación no encontrada";
pub const GENERAL_APPLICATION: &str = "Solicitud general";
const ENTITY: &str = "job_application";
const SOURCE: &str = "bolsa_de_trabajo";

/// Validates a public application. `posting_title` is the title of the
/// referenced job posting when one was found.
pub fn build_job_application(
    payload: JobApplicationPayload,
    posting_title: Option<String>,
    client: &ClientInfo,
    now: DateTime<Utc>,
) -> Result<JobApplication> {
    RequiredFields::new()
        .check("nombre", &payload.first_name)
        .check("apellidos", &payload.last_name)
        .check("email", &payload.email)
        .check("teléfono", &payload.phone)
        .check("escolaridad", &payload.education_level)
        .check_true("aceptación del aviso de privacidad", payload.accepts_privacy_policy)
        .finish()?;
    payload.validate()?;

    let email = payload.email.unwrap_or_default();
    let phone = payload.phone.unwrap_or_default();
    ensure_email(&email)?;
    ensure_phone(&phone)?;
    if let Some(cv_url) = &payload.cv_url {
        ensure_url("CV", cv_url)?;
    }
    if let Some(birth_date) = payload.birth_date {
        if birth_date >= now.date_naive() {
            return Err(Error::BadRequest("Fecha de nacimiento inválida".into()));
        }
    }

    let job_title = payload
        .job_title
        .or(posting_title)
        .unwrap_or_else(|| GENERAL_APPLICATION.to_string());

    Ok(JobApplication {
        job_id: payload.job_id,
        job_title,
        first_name: payload.first_name.unwrap_or_default(),
        last_name: payload.last_name.unwrap_or_default(),
        email,
        phone,
        city: payload.city,
        birth_date: payload.birth_date,
        education_level: payload
            .education_level
            .ok_or_else(|| Error::BadRequest("Faltan campos requeridos: escolaridad".into()))?,
        experience: payload.experience,
        expected_salary: payload.expected_salary,
        availability: payload.availability,
        cv_url: payload.cv_url,
        accepts_privacy_policy: true,
        wants_job_alerts: payload.wants_job_alerts.unwrap_or(false),
        status: ApplicationStatus::initial(),
        notes: None,
        reviewed_by: None,
        source: SOURCE.to_string(),
        ip_address: client.ip_address.clone(),
        user_agent: client.user_agent.clone(),
        status_history: Vec::new(),
    })
}

#[derive(Clone)]
pub struct JobApplicationService {
    applications: Collection<JobApplication>,
    postings: Collection<JobPosting>,
    activity: ActivityService,
    notifications: NotificationService,
}

impl JobApplicationService {
    pub fn new(store: Arc<dyn DocumentStore>, notifications: NotificationService) -> Self {
        Self {
            applications: Collection::new(store.clone(), job_application::COLLECTION),
            postings: Collection::new(store.clone(), JobPosting::COLLECTION),
            activity: ActivityService::new(store),
            notifications,
        }
    }

    pub async fn submit(
        &self,
        payload: JobApplicationPayload,
        client: &ClientInfo,
    ) -> Result<Record<JobApplication>> {
        let posting_title = match (&payload.job_id, &payload.job_title) {
            (Some(job_id), None) => self.postings.get(job_id).await?.map(|p| p.data.title),
            _ => None,
        };
        let application = build_job_application(payload, posting_title, client, Utc::now())?;
        let record = self.applications.insert(&application).await?;
        info!(id = %record.id, job = %record.data.job_title, "job application received");

        self.activity
            .log(
                None,
                "created",
                ENTITY,
                &record.id,
                Some(json!({ "job_id": record.data.job_id, "job_title": record.data.job_title })),
                client,
            )
            .await;
        self.notifications.application_received(&record).await;

        Ok(record)
    }

    pub async fn list(&self, query: JobApplicationListQuery) -> Result<Page<JobApplication>> {
        let status = parse_status_filter::<ApplicationStatus>(query.status.as_deref())?;
        let filter = DocumentQuery::new()
            .eq_opt("status", status.map(|s| s.as_str()))
            .eq_opt("job_id", query.job_id);
        self.applications.page(filter, query.page, query.per_page).await
    }

    pub async fn all(&self, status: Option<&str>) -> Result<Vec<Record<JobApplication>>> {
        let status = parse_status_filter::<ApplicationStatus>(status)?;
        self.applications
            .find(&DocumentQuery::new().eq_opt("status", status.map(|s| s.as_str())))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Record<JobApplication>> {
        self.applications.require(id, NOT_FOUND).await
    }

    pub async fn update(
        &self,
        id: &str,
        payload: UpdateJobApplicationPayload,
        actor: &str,
        client: &ClientInfo,
    ) -> Result<Record<JobApplication>> {
        payload.validate()?;
        let current = self.get(id).await?;
        let from = current.data.status;

        let mut patch = Map::new();
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
                patch.insert("reviewed_by".into(), JsonValue::String(actor.to_string()));
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
            .applications
            .patch(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(NOT_FOUND.into()))?;

        if let Some(to) = changed_to {
            info!(id, from = %from, to = %to, actor, "job application status changed");
        }
        self.activity
            .log(
                Some(actor),
                if changed_to.is_some() { "status_changed" } else { "updated" },
                ENTITY,
                id,
                Some(json!({ "from": from, "to": changed_to, "notes_updated": payload.notes.is_some() })),
                client,
            )
            .await;

        Ok(updated)
    }
}
