use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::models::user::Role;
use crate::services::auth_service::decode_token;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.is_empty() || roles.contains(&self.role)
    }
}

/// State for `require_roles`; an empty role list admits any signed-in staff member.
#[derive(Clone)]
pub struct RoleGuard {
    secret: Option<Arc<str>>,
    allowed: &'static [Role],
}

impl RoleGuard {
    pub fn new(config: &Config, allowed: &'static [Role]) -> Self {
        Self {
            secret: config.jwt_secret.as_deref().map(Arc::from),
            allowed,
        }
    }
}

fn bearer_token(req: &Request) -> Result<&str, Error> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("Autenticación requerida".into()))?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| Error::Unauthorized("Encabezado de autorización inválido".into()))?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Unauthorized("Esquema de autorización no soportado".into()))
}

pub async fn require_roles(State(guard): State<RoleGuard>, mut req: Request, next: Next) -> Response {
    let Some(secret) = guard.secret.as_deref() else {
        return Error::unavailable("autenticación").into_response();
    };
    let claims = match bearer_token(&req).and_then(|token| decode_token(secret, token)) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };
    if !claims.has_role(guard.allowed) {
        tracing::debug!(user = %claims.sub, role = %claims.role, "role not allowed");
        return Error::Forbidden("No tienes permiso para esta acción".into()).into_response();
    }
    req.extensions_mut().insert(claims);
    next.run(req).await
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| Error::Unauthorized("Autenticación requerida".into()))
    }
}
