use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::status::{ApplicationStatus, StatusChange};

pub const COLLECTION: &str = "job_applications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Primaria,
    Secundaria,
    Preparatoria,
    Tecnico,
    Licenciatura,
    Posgrado,
}

impl EducationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Primaria => "Primaria",
            EducationLevel::Secundaria => "Secundaria",
            EducationLevel::Preparatoria => "Preparatoria / Bachillerato",
            EducationLevel::Tecnico => "Carrera técnica",
            EducationLevel::Licenciatura => "Licenciatura",
            EducationLevel::Posgrado => "Posgrado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub job_id: Option<String>,
    pub job_title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub education_level: EducationLevel,
    pub experience: Option<String>,
    pub expected_salary: Option<String>,
    pub availability: Option<String>,
    pub cv_url: Option<String>,
    pub accepts_privacy_policy: bool,
    #[serde(default)]
    pub wants_job_alerts: bool,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub status_history: Vec<StatusChange<ApplicationStatus>>,
}

impl JobApplication {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
