use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::status::{ContactStatus, StatusChange};

pub const COLLECTION: &str = "contact_requests";
pub const TRACKING_PREFIX: &str = "SOL";
pub const DEFAULT_SOURCE: &str = "sitio_web";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BudgetBracket {
    #[serde(rename = "menos_10k")]
    Under10k,
    #[serde(rename = "10k_50k")]
    From10kTo50k,
    #[serde(rename = "50k_100k")]
    From50kTo100k,
    #[serde(rename = "mas_100k")]
    Over100k,
}

impl BudgetBracket {
    pub fn label(self) -> &'static str {
        match self {
            BudgetBracket::Under10k => "Menos de $10,000",
            BudgetBracket::From10kTo50k => "$10,000 - $50,000",
            BudgetBracket::From50kTo100k => "$50,000 - $100,000",
            BudgetBracket::Over100k => "Más de $100,000",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Cotizacion,
    #[default]
    Informacion,
    Proveedor,
    Mayoreo,
    Otro,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub tracking_id: String,
    pub company_name: Option<String>,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub branch_id: Option<String>,
    pub location: Option<String>,
    pub budget: Option<BudgetBracket>,
    #[serde(default)]
    pub request_type: RequestType,
    pub description: String,
    #[serde(default)]
    pub newsletter: bool,
    pub status: ContactStatus,
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status_history: Vec<StatusChange<ContactStatus>>,
}
