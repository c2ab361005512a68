pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::store::DocumentStore;
use crate::error::{Error, Result};
use crate::services::{
    email_service::{BrevoMailer, DisabledMailer, Mailer},
    media_service::{CloudinaryHost, MediaHost},
    notification_service::NotificationService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Option<Arc<dyn DocumentStore>>,
    pub mailer: Arc<dyn Mailer>,
    pub media: Option<Arc<dyn MediaHost>>,
}

impl AppState {
    /// Builds the integrations the configuration enables; the rest stay off.
    pub fn new(config: Config, store: Option<Arc<dyn DocumentStore>>) -> Result<Self> {
        let mailer: Arc<dyn Mailer> = match config.email.clone() {
            Some(settings) => Arc::new(BrevoMailer::new(settings)?),
            None => {
                tracing::warn!("EMAIL_API_KEY not set; emails will be skipped");
                Arc::new(DisabledMailer)
            }
        };
        let media: Option<Arc<dyn MediaHost>> = match config.media.clone() {
            Some(settings) => Some(Arc::new(CloudinaryHost::new(settings)?)),
            None => {
                tracing::warn!("MEDIA_CLOUD_NAME not set; file uploads are disabled");
                None
            }
        };
        if config.jwt_secret.is_none() {
            tracing::warn!("JWT_SECRET not set; staff routes will answer 503");
        }

        Ok(Self {
            config: Arc::new(config),
            store,
            mailer,
            media,
        })
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaHost>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn store(&self) -> Result<Arc<dyn DocumentStore>> {
        self.store
            .clone()
            .ok_or_else(|| Error::unavailable("base de datos"))
    }

    pub fn media(&self) -> Result<Arc<dyn MediaHost>> {
        self.media
            .clone()
            .ok_or_else(|| Error::unavailable("almacenamiento de archivos"))
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(self.mailer.clone(), self.config.email.as_ref())
    }
}
