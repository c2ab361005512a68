use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::config::EmailSettings;
use crate::database::collection::Record;
use crate::models::contact_request::ContactRequest;
use crate::models::job_application::JobApplication;
use crate::models::quotation::Quotation;
use crate::services::email_service::{EmailMessage, EmailTemplate, Mailer, Recipient};

/// Best-effort customer and staff emails. Failures are logged, never returned.
#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    notify_to: Vec<String>,
    hr_notify_to: Vec<String>,
}

impl NotificationService {
    pub fn new(mailer: Arc<dyn Mailer>, settings: Option<&EmailSettings>) -> Self {
        let (notify_to, hr_notify_to) = settings
            .map(|s| (s.notify_to.clone(), s.hr_notify_to.clone()))
            .unwrap_or_default();
        Self {
            mailer,
            notify_to,
            hr_notify_to,
        }
    }

    /// Confirmation to the customer plus the internal alert. Returns how many sends succeeded.
    pub async fn contact_received(&self, record: &Record<ContactRequest>) -> usize {
        let request = &record.data;
        let params = json!({
            "tracking_id": request.tracking_id,
            "contact_name": request.contact_name,
            "company_name": request.company_name,
            "email": request.email,
            "phone": request.phone,
            "branch_id": request.branch_id,
            "location": request.location,
            "budget": request.budget.map(|b| b.label()),
            "request_type": request.request_type,
            "description": request.description,
            "created_at": record.created_at.format("%d/%m/%Y %H:%M").to_string(),
        });

        let mut sent = 0;
        if self
            .deliver(
                EmailMessage {
                    template: EmailTemplate::ContactConfirmation,
                    to: vec![Recipient::new(&request.email, Some(request.contact_name.clone()))],
                    reply_to: None,
                    params: params.clone(),
                },
                &record.id,
            )
            .await
        {
            sent += 1;
        }
        if let Some(internal) = internal_message(
            EmailTemplate::ContactInternal,
            &self.notify_to,
            Recipient::new(&request.email, Some(request.contact_name.clone())),
            params,
        ) {
            if self.deliver(internal, &record.id).await {
                sent += 1;
            }
        }
        sent
    }

    pub async fn application_received(&self, record: &Record<JobApplication>) -> usize {
        let application = &record.data;
        let params = json!({
            "full_name": application.full_name(),
            "first_name": application.first_name,
            "job_title": application.job_title,
            "email": application.email,
            "phone": application.phone,
            "city": application.city,
            "education_level": application.education_level.label(),
            "experience": application.experience,
            "availability": application.availability,
            "cv_url": application.cv_url,
            "created_at": record.created_at.format("%d/%m/%Y %H:%M").to_string(),
        });

        let mut sent = 0;
        if self
            .deliver(
                EmailMessage {
                    template: EmailTemplate::ApplicationConfirmation,
                    to: vec![Recipient::new(&application.email, Some(application.full_name()))],
                    reply_to: None,
                    params: params.clone(),
                },
                &record.id,
            )
            .await
        {
            sent += 1;
        }
        if let Some(internal) = internal_message(
            EmailTemplate::ApplicationInternal,
            &self.hr_notify_to,
            Recipient::new(&application.email, Some(application.full_name())),
            params,
        ) {
            if self.deliver(internal, &record.id).await {
                sent += 1;
            }
        }
        sent
    }

    pub async fn quotation_sent(&self, record: &Record<Quotation>) -> bool {
        let quotation = &record.data;
        let items: Vec<_> = quotation
            .items
            .iter()
            .map(|item| {
                json!({
                    "description": item.description,
                    "sku": item.sku,
                    "quantity": item.quantity.to_string(),
                    "unit_price": item.unit_price.to_string(),
                    "line_total": item.line_total().unwrap_or_default().to_string(),
                })
            })
            .collect();
        let message = EmailMessage {
            template: EmailTemplate::QuotationSent,
            to: vec![Recipient::new(
                &quotation.customer_email,
                Some(quotation.customer_name.clone()),
            )],
            reply_to: None,
            params: json!({
                "folio": quotation.folio,
                "customer_name": quotation.customer_name,
                "items": items,
                "subtotal": quotation.subtotal.to_string(),
                "tax": quotation.tax.to_string(),
                "total": quotation.total.to_string(),
                "valid_until": quotation.valid_until.map(|d| d.format("%d/%m/%Y").to_string()),
                "notes": quotation.notes,
            }),
        };
        self.deliver(message, &record.id).await
    }

    async fn deliver(&self, message: EmailMessage, record_id: &str) -> bool {
        if !self.mailer.is_enabled() {
            info!(template = ?message.template, record_id, "email not configured, skipping send");
            return false;
        }
        let template = message.template;
        match self.mailer.send(message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, template = ?template, record_id, "email send failed");
                false
            }
        }
    }
}

fn internal_message(
    template: EmailTemplate,
    recipients: &[String],
    reply_to: Recipient,
    params: serde_json::Value,
) -> Option<EmailMessage> {
    if recipients.is_empty() {
        return None;
    }
    Some(EmailMessage {
        template,
        to: recipients
            .iter()
            .map(|email| Recipient::new(email, None))
            .collect(),
        reply_to: Some(reply_to),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::contact_request::{RequestType, DEFAULT_SOURCE};
    use crate::models::status::ContactStatus;
    use crate::services::email_service::MockMailer;
    use chrono::Utc;
    use std::collections::HashMap;

    fn contact_record() -> Record<ContactRequest> {
        Record {
            id: "c1".into(),
            data: ContactRequest {
                tracking_id: "SOL-20261016-ABCDEF".into(),
                company_name: None,
                contact_name: "Luis Pérez".into(),
                email: "luis@correo.mx".into(),
                phone: "5512345678".into(),
                branch_id: None,
                location: None,
                budget: None,
                request_type: RequestType::Cotizacion,
                description: "Necesito 40 bultos de cemento".into(),
                newsletter: false,
                status: ContactStatus::Pendiente,
                source: DEFAULT_SOURCE.into(),
                ip_address: None,
                user_agent: None,
                assigned_to: None,
                notes: None,
                status_history: vec![],
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn settings(notify_to: Vec<String>) -> EmailSettings {
        EmailSettings {
            api_key: "k".into(),
            api_url: "http://localhost".into(),
            sender_email: "no-reply@ferreteria.mx".into(),
            sender_name: "Ferretería".into(),
            notify_to,
            hr_notify_to: vec![],
            templates: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn send_failures_are_swallowed() {
        let mut mailer = MockMailer::new();
        mailer.expect_is_enabled().return_const(true);
        mailer
            .expect_send()
            .times(2)
            .returning(|_| Err(Error::Internal("provider down".into())));
        let service = NotificationService::new(
            Arc::new(mailer),
            Some(&settings(vec!["ventas@ferreteria.mx".into()])),
        );
        assert_eq!(service.contact_received(&contact_record()).await, 0);
    }

    #[tokio::test]
    async fn internal_alert_goes_to_staff_with_customer_reply_to() {
        let mut mailer = MockMailer::new();
        mailer.expect_is_enabled().return_const(true);
        mailer
            .expect_send()
            .withf(|m| m.template == EmailTemplate::ContactConfirmation && m.to[0].email == "luis@correo.mx")
            .times(1)
            .returning(|_| Ok(()));
        mailer
            .expect_send()
            .withf(|m| {
                m.template == EmailTemplate::ContactInternal
                    && m.to[0].email == "ventas@ferreteria.mx"
                    && m.reply_to.as_ref().map(|r| r.email.as_str()) == Some("luis@correo.mx")
            })
            .times(1)
            .returning(|_| Ok(()));
        let service = NotificationService::new(
            Arc::new(mailer),
            Some(&settings(vec!["ventas@ferreteria.mx".into()])),
        );
        assert_eq!(service.contact_received(&contact_record()).await, 2);
    }

    #[tokio::test]
    async fn disabled_mailer_is_never_called() {
        let mut mailer = MockMailer::new();
        mailer.expect_is_enabled().return_const(false);
        mailer.expect_send().never();
        let service = NotificationService::new(Arc::new(mailer), None);
        assert_eq!(service.contact_received(&contact_record()).await, 0);
    }
}
