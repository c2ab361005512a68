use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::job_application::EducationLevel;
use crate::models::status::ApplicationStatus;
use crate::utils::validation::clean_optional_string;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct JobApplicationPayload {
    #[serde(default, deserialize_with = "clean_optional_string")]
    pub job_id: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 150, message = "El puesto no debe exceder 150 caracteres"))]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 80, message = "El nombre no debe exceder 80 caracteres"))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 80, message = "Los apellidos no deben exceder 80 caracteres"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 254, message = "El email no debe exceder 254 caracteres"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 25, message = "El teléfono no debe exceder 25 caracteres"))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 80, message = "La ciudad no debe exceder 80 caracteres"))]
    pub city: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub education_level: Option<EducationLevel>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 3000, message = "La experiencia no debe exceder 3000 caracteres"))]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 60, message = "La pretensión salarial no debe exceder 60 caracteres"))]
    pub expected_salary: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 120, message = "La disponibilidad no debe exceder 120 caracteres"))]
    pub availability: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    pub cv_url: Option<String>,
    #[serde(default)]
    pub accepts_privacy_policy: Option<bool>,
    #[serde(default)]
    pub wants_job_alerts: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobApplicationListQuery {
    pub status: Option<String>,
    pub job_id: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateJobApplicationPayload {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 3000, message = "Las notas no deben exceder 3000 caracteres"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobApplicationReceipt {
    pub id: String,
    pub status: ApplicationStatus,
}
