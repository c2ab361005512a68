use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::info;
use validator::Validate;

use crate::config::Config;
use crate::database::collection::{Collection, Record};
use crate::database::store::{DocumentQuery, DocumentStore};
use crate::dto::auth_dto::{CreateUserPayload, LoginPayload, LoginResponse, UserResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::{self, Role, User};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::validation::{ensure_email, RequiredFields};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

pub fn issue_token(
    secret: &str,
    user_id: &str,
    user: &User,
    ttl_hours: i64,
) -> Result<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours.max(1));
    let claims = Claims {
        sub: user_id.to_string(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))?;
    Ok((token, expires_at))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| Error::Unauthorized("Token inválido o expirado".into()))
}

#[derive(Clone)]
pub struct AuthService {
    users: Collection<User>,
    config: Arc<Config>,
}

impl AuthService {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<Config>) -> Self {
        Self {
            users: Collection::new(store, user::COLLECTION),
            config,
        }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse> {
        let secret = self
            .config
            .jwt_secret
            .as_deref()
            .ok_or_else(|| Error::unavailable("autenticación"))?;

        RequiredFields::new()
            .check("email", &payload.email)
            .check("contraseña", &payload.password)
            .finish()?;
        let email = payload.email.unwrap_or_default().to_lowercase();
        let password = payload.password.unwrap_or_default();

        let Some(record) = self.find_by_email(&email).await? else {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
        };
        if !verify_password(&password, &record.data.password_hash) {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        if !record.data.active {
            return Err(Error::Forbidden("Cuenta desactivada".into()));
        }

        let (token, expires_at) =
            issue_token(secret, &record.id, &record.data, self.config.jwt_ttl_hours)?;
        info!(user_id = %record.id, role = %record.data.role, "staff login");

        Ok(LoginResponse {
            token,
            expires_at,
            user: record.into(),
        })
    }

    pub async fn me(&self, claims: &Claims) -> Result<UserResponse> {
        let record = self
            .users
            .get(&claims.sub)
            .await?
            .filter(|r| r.data.active)
            .ok_or_else(|| Error::Unauthorized("Usuario no encontrado".into()))?;
        Ok(record.into())
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        let users = self.users.find(&DocumentQuery::new()).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<UserResponse> {
        RequiredFields::new()
            .check("email", &payload.email)
            .check("nombre", &payload.name)
            .check("rol", &payload.role)
            .check("contraseña", &payload.password)
            .finish()?;
        payload.validate()?;

        let email = payload.email.unwrap_or_default().to_lowercase();
        ensure_email(&email)?;
        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::BadRequest("Ya existe un usuario con ese email".into()));
        }

        let user = User {
            email,
            name: payload.name.unwrap_or_default(),
            role: payload.role.unwrap_or(Role::Vendor),
            password_hash: hash_password(&payload.password.unwrap_or_default())?,
            active: true,
        };
        let record = self.users.insert(&user).await?;
        info!(user_id = %record.id, role = %record.data.role, "staff user created");
        Ok(record.into())
    }

    /// Creates the first admin from `ADMIN_EMAIL` / `ADMIN_PASSWORD` when no user has that email.
    pub async fn bootstrap_admin(&self) -> Result<bool> {
        let (Some(email), Some(password)) = (
            self.config.admin_email.as_deref(),
            self.config.admin_password.as_deref(),
        ) else {
            return Ok(false);
        };
        let email = email.to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Ok(false);
        }
        ensure_email(&email)?;
        let admin = User {
            email,
            name: "Administrador".into(),
            role: Role::Admin,
            password_hash: hash_password(password)?,
            active: true,
        };
        let record = self.users.insert(&admin).await?;
        info!(user_id = %record.id, "bootstrap admin created");
        Ok(true)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Record<User>>> {
        let mut found = self
            .users
            .find(&DocumentQuery::new().eq("email", email).limit(1))
            .await?;
        Ok(found.pop())
    }
}
