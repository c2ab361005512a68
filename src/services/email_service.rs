use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info};

use crate::config::EmailSettings;
use crate::error::{Error, Result};

/// Transactional templates kept in the email provider, addressed by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailTemplate {
    ContactConfirmation,
    ContactInternal,
    ApplicationConfirmation,
    ApplicationInternal,
    QuotationSent,
}

impl EmailTemplate {
    pub const ALL: [EmailTemplate; 5] = [
        EmailTemplate::ContactConfirmation,
        EmailTemplate::ContactInternal,
        EmailTemplate::ApplicationConfirmation,
        EmailTemplate::ApplicationInternal,
        EmailTemplate::QuotationSent,
    ];

    /// Suffix of the `EMAIL_TEMPLATE_*` variable overriding the id.
    pub fn env_suffix(self) -> &'static str {
        match self {
            EmailTemplate::ContactConfirmation => "CONTACT_CONFIRMATION",
            EmailTemplate::ContactInternal => "CONTACT_INTERNAL",
            EmailTemplate::ApplicationConfirmation => "APPLICATION_CONFIRMATION",
            EmailTemplate::ApplicationInternal => "APPLICATION_INTERNAL",
            EmailTemplate::QuotationSent => "QUOTATION_SENT",
        }
    }

    pub fn default_id(self) -> i64 {
        match self {
            EmailTemplate::ContactConfirmation => 1,
            EmailTemplate::ContactInternal => 2,
            EmailTemplate::ApplicationConfirmation => 3,
            EmailTemplate::ApplicationInternal => 4,
            EmailTemplate::QuotationSent => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub template: EmailTemplate,
    pub to: Vec<Recipient>,
    pub reply_to: Option<Recipient>,
    pub params: JsonValue,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    fn is_enabled(&self) -> bool;

    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// Brevo-compatible template send over HTTPS.
pub struct BrevoMailer {
    client: Client,
    settings: EmailSettings,
}

const SEND_TIMEOUT: Duration = Duration::from_secs(15);

impl BrevoMailer {
    pub fn new(settings: EmailSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client for email: {}", e)))?;
        info!(sender = %settings.sender_email, "Email delivery enabled");
        Ok(Self { client, settings })
    }

    fn body(&self, message: &EmailMessage) -> JsonValue {
        let mut body = json!({
            "sender": {
                "email": self.settings.sender_email,
                "name": self.settings.sender_name,
            },
            "to": message.to,
            "templateId": self.settings.template_id(message.template),
            "params": message.params,
        });
        if let Some(reply_to) = &message.reply_to {
            body["replyTo"] = json!(reply_to);
        }
        body
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, message: EmailMessage) -> Result<()> {
        if message.to.is_empty() {
            debug!(template = ?message.template, "no recipients, skipping email");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.settings.api_url)
            .header("api-key", &self.settings.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.body(&message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(template = ?message.template, recipients = message.to.len(), "email accepted");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Internal(format!(
                "Email API responded with {}: {}",
                status, body
            )))
        }
    }
}

/// Stand-in used when `EMAIL_API_KEY` is absent.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send(&self, _message: EmailMessage) -> Result<()> {
        Err(Error::unavailable("email"))
    }
}
