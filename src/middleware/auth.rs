use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
    Customer,
}

impl Role {
    /// Accepts `admin`, `ADMIN` and Spring-style `ROLE_ADMIN`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw
            .strip_prefix("ROLE_")
            .or_else(|| raw.strip_prefix("role_"))
            .unwrap_or(raw);
        match raw.to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "employee" | "staff" => Some(Role::Employee),
            "customer" | "user" => Some(Role::Customer),
            _ => None,
        }
    }
}

/// Claims carried by the session token the storefront backend issues.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// Identity of the caller, threaded explicitly into every service call.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: i64,
    pub role: Role,
    /// Raw bearer token, forwarded to the upstream API.
    pub token: String,
}

impl Session {
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Employee)
    }
}

pub fn ensure_staff(session: &Session) -> Result<(), AppError> {
    if !session.is_staff() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn decode_session(token: &str, secret: &str) -> Result<Session, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let account_id = decoded
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("Invalid account id in token".into()))?;
    let role = Role::parse(&decoded.claims.role)
        .ok_or_else(|| AppError::Unauthorized("Unknown role in token".into()))?;

    Ok(Session {
        account_id,
        role,
        token: token.to_string(),
    })
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        decode_session(token, &state.jwt_secret)
    }
}
