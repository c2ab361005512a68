use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::contact_request::{BudgetBracket, RequestType};
use crate::models::status::ContactStatus;
use crate::utils::validation::clean_optional_string;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ContactPayload {
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 150, message = "El nombre de la empresa no debe exceder 150 caracteres"))]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 120, message = "El nombre no debe exceder 120 caracteres"))]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 254, message = "El email no debe exceder 254 caracteres"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 25, message = "El teléfono no debe exceder 25 caracteres"))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 150, message = "La ubicación no debe exceder 150 caracteres"))]
    pub location: Option<String>,
    #[serde(default)]
    pub budget: Option<BudgetBracket>,
    #[serde(default)]
    pub request_type: Option<RequestType>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 2000, message = "La descripción no debe exceder 2000 caracteres"))]
    pub description: Option<String>,
    #[serde(default)]
    pub newsletter: Option<bool>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 40, message = "El origen no debe exceder 40 caracteres"))]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactReceipt {
    pub id: String,
    pub tracking_id: String,
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequestListQuery {
    pub status: Option<String>,
    pub branch_id: Option<String>,
    pub assigned_to: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContactRequestPayload {
    #[serde(default)]
    pub status: Option<ContactStatus>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 120, message = "El responsable asignado no debe exceder 120 caracteres"))]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 2000, message = "Las notas no deben exceder 2000 caracteres"))]
    pub notes: Option<String>,
}
