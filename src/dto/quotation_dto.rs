use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::status::QuotationStatus;
use crate::utils::validation::clean_optional_string;

pub const MAX_QUOTATION_ITEMS: usize = 200;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct QuotationItemPayload {
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 300, message = "La descripción del artículo no debe exceder 300 caracteres"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 60, message = "El SKU no debe exceder 60 caracteres"))]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateQuotationPayload {
    #[serde(default, deserialize_with = "clean_optional_string")]
    pub request_id: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 150, message = "El nombre del cliente no debe exceder 150 caracteres"))]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 254, message = "El email del cliente no debe exceder 254 caracteres"))]
    pub customer_email: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    pub branch_id: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Option<Vec<QuotationItemPayload>>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 2000, message = "Las notas no deben exceder 2000 caracteres"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

/// Items and validity can only change while the quotation is a draft.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuotationPayload {
    #[serde(default)]
    pub status: Option<QuotationStatus>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Option<Vec<QuotationItemPayload>>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 2000, message = "Las notas no deben exceder 2000 caracteres"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuotationListQuery {
    pub status: Option<String>,
    pub request_id: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
