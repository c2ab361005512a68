use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::clean_optional_string;

// Catalog payloads double as partial updates: unset fields are skipped on serialize.

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BranchPayload {
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "El nombre no debe exceder 120 caracteres"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 250, message = "La dirección no debe exceder 250 caracteres"))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "La ciudad no debe exceder 80 caracteres"))]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "El estado no debe exceder 80 caracteres"))]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 10, message = "El código postal no debe exceder 10 caracteres"))]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "El horario no debe exceder 200 caracteres"))]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitud fuera de rango"))]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitud fuera de rango"))]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "El nombre del gerente no debe exceder 120 caracteres"))]
    pub manager_name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BrandPayload {
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "El nombre no debe exceder 120 caracteres"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "La descripción no debe exceder 1000 caracteres"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "La categoría no debe exceder 80 caracteres"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewsPayload {
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "El título no debe exceder 200 caracteres"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "El resumen no debe exceder 500 caracteres"))]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20000, message = "El contenido no debe exceder 20000 caracteres"))]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "El autor no debe exceder 120 caracteres"))]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "La categoría no debe exceder 80 caracteres"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PromotionPayload {
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "El título no debe exceder 200 caracteres"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "La descripción no debe exceder 2000 caracteres"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40, message = "El descuento no debe exceder 40 caracteres"))]
    pub discount: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Los términos no deben exceder 2000 caracteres"))]
    pub terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JobPostingPayload {
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 150, message = "El puesto no debe exceder 150 caracteres"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "El departamento no debe exceder 80 caracteres"))]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "La ubicación no debe exceder 120 caracteres"))]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40, message = "El tipo de empleo no debe exceder 40 caracteres"))]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000, message = "La descripción no debe exceder 5000 caracteres"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000, message = "Los requisitos no deben exceder 5000 caracteres"))]
    pub requirements: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "El rango salarial no debe exceder 80 caracteres"))]
    pub salary_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogListQuery {
    pub featured: Option<bool>,
    pub limit: Option<i64>,
}
