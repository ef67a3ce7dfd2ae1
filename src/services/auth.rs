use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::UserRole;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid, // user id
    pub company_id: Uuid,
    pub role: UserRole,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn new(user_id: Uuid, company_id: Uuid, role: UserRole, ttl: Duration) -> Self {
        let exp = (Utc::now() + ttl).timestamp().max(0) as usize;

        Self {
            sub: user_id,
            company_id,
            role,
            exp,
        }
    }
}

/// Sign claims with the shared HS256 secret. Issuing tokens to real users
/// happens elsewhere; this is used by tooling and tests.
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AppError::internal_server_error_message(format!("token signing failed: {}", e)))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized
    })
}

/// Who is calling and on behalf of which company. Every engine operation is
/// scoped by `company_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: UserRole,
}

impl TenantContext {
    pub fn requires_payroll(&self) -> Result<(), AppError> {
        if self.role.can_manage_payroll() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "role {} cannot settle or void payouts",
                self.role
            )))
        }
    }
}

impl From<Claims> for TenantContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            company_id: claims.company_id,
            role: claims.role,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequest for TenantContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<Data<Config>>() else {
            return ready(Err(AppError::internal_server_error_message(
                "configuration is not registered",
            )));
        };

        let result = bearer_token(req)
            .ok_or(AppError::Unauthorized)
            .and_then(|token| decode_token(token, &config.jwt_secret))
            .map(TenantContext::from);

        ready(result)
    }
}
