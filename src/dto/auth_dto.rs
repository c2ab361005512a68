use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::database::collection::Record;
use crate::models::user::{Role, User};
use crate::utils::validation::clean_optional_string;

// Passwords are taken verbatim; only identifiers are cleaned.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginPayload {
    #[serde(default, deserialize_with = "clean_optional_string")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 254, message = "El email no debe exceder 254 caracteres"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "clean_optional_string")]
    #[validate(length(max = 120, message = "El nombre no debe exceder 120 caracteres"))]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    #[validate(length(max = 128, message = "La contraseña no debe exceder 128 caracteres"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Record<User>> for UserResponse {
    fn from(record: Record<User>) -> Self {
        Self {
            id: record.id,
            email: record.data.email,
            name: record.data.name,
            role: record.data.role,
            active: record.data.active,
            created_at: record.created_at,
        }
    }
}
