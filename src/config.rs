use crate::error::{Error, Result};
use crate::services::email_service::EmailTemplate;
use dotenvy::dotenv;
use std::collections::HashMap;
use std::env;
use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub app_env: String,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_ttl_hours: i64,
    pub public_rps: u32,
    pub max_upload_bytes: usize,
    pub trusted_proxies: Vec<IpAddr>,
    pub email: Option<EmailSettings>,
    pub media: Option<MediaSettings>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub api_key: String,
    pub api_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub notify_to: Vec<String>,
    pub hr_notify_to: Vec<String>,
    pub templates: HashMap<EmailTemplate, i64>,
}

#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_folder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8080".to_string(),
            app_env: "development".to_string(),
            database_url: None,
            jwt_secret: None,
            jwt_ttl_hours: 12,
            public_rps: 20,
            max_upload_bytes: 10 * 1024 * 1024,
            trusted_proxies: Vec::new(),
            email: None,
            media: None,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        Ok(Self {
            server_address: get_env_opt("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            app_env: get_env_opt("APP_ENV").unwrap_or(defaults.app_env),
            database_url: get_env_opt("DATABASE_URL"),
            jwt_secret: get_env_opt("JWT_SECRET"),
            jwt_ttl_hours: get_env_parse_or("JWT_TTL_HOURS", defaults.jwt_ttl_hours)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", defaults.public_rps)?,
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            trusted_proxies: parse_proxies(split_list(get_env_opt("TRUSTED_PROXIES")))?,
            email: EmailSettings::from_env()?,
            media: MediaSettings::from_env(),
            admin_email: get_env_opt("ADMIN_EMAIL"),
            admin_password: get_env_opt("ADMIN_PASSWORD"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

impl EmailSettings {
    fn from_env() -> Result<Option<Self>> {
        let Some(api_key) = get_env_opt("EMAIL_API_KEY") else {
            return Ok(None);
        };
        let sender_email = get_env("EMAIL_SENDER")?;

        let mut templates = HashMap::new();
        for template in EmailTemplate::ALL {
            let name = format!("EMAIL_TEMPLATE_{}", template.env_suffix());
            let id = get_env_parse_or(&name, template.default_id())?;
            templates.insert(template, id);
        }

        Ok(Some(Self {
            api_key,
            api_url: get_env_opt("EMAIL_API_URL")
                .unwrap_or_else(|| "https://api.brevo.com/v3/smtp/email".to_string()),
            sender_email,
            sender_name: get_env_opt("EMAIL_SENDER_NAME")
                .unwrap_or_else(|| "Ferretería".to_string()),
            notify_to: split_list(get_env_opt("EMAIL_NOTIFY_TO")),
            hr_notify_to: split_list(get_env_opt("EMAIL_HR_NOTIFY_TO")),
            templates,
        }))
    }

    pub fn template_id(&self, template: EmailTemplate) -> i64 {
        self.templates
            .get(&template)
            .copied()
            .unwrap_or_else(|| template.default_id())
    }
}

impl MediaSettings {
    fn from_env() -> Option<Self> {
        Some(Self {
            cloud_name: get_env_opt("MEDIA_CLOUD_NAME")?,
            api_key: get_env_opt("MEDIA_API_KEY")?,
            api_secret: get_env_opt("MEDIA_API_SECRET")?,
            base_folder: get_env_opt("MEDIA_BASE_FOLDER").unwrap_or_else(|| "ferreteria".to_string()),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    get_env_opt(name).ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_proxies(raw: Vec<String>) -> Result<Vec<IpAddr>> {
    raw.iter()
        .map(|item| {
            item.parse()
                .map_err(|e| Error::Config(format!("Invalid value for TRUSTED_PROXIES: {}: {}", item, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blank_entries() {
        let list = split_list(Some(" ventas@ferre.mx, ,gerencia@ferre.mx ".to_string()));
        assert_eq!(list, vec!["ventas@ferre.mx", "gerencia@ferre.mx"]);
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn trusted_proxies_must_be_ip_addresses() {
        let parsed = parse_proxies(vec!["10.0.0.1".into(), "::1".into()]).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parse_proxies(vec!["proxy.local".into()]).is_err());
    }

    #[test]
    fn defaults_disable_every_integration() {
        let config = Config::default();
        assert!(config.database_url.is_none());
        assert!(config.email.is_none());
        assert!(config.media.is_none());
        assert!(!config.is_production());
    }
}
