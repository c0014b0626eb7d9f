use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::axum_http::error_responses::ErrorResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub role: String,
    pub email: Option<String>,
    pub aud: String,
    pub exp: usize,
}

/// HS256 secret used to verify bearer tokens. Installed as a request extension by the server.
#[derive(Clone)]
pub struct AuthSecret(Arc<String>);

impl AuthSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::new(secret.into()))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// The authenticated caller. `user_id` is the raw `sub` claim; use cases validate its format.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> Response {
        reject(StatusCode::UNAUTHORIZED, format!("Unauthorized: {}", self.0))
    }
}

pub fn validate_jwt(token: &str, secret: &AuthSecret) -> Result<UserClaims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_audience(&["authenticated", "service_role"]);

    let token_data = decode::<UserClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

fn reject(status: StatusCode, message: impl Into<String>) -> Response {
    ErrorResponse::into_response_with(status, message)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let secret = parts.extensions.get::<AuthSecret>().cloned().ok_or_else(|| {
            reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication is not configured",
            )
        })?;

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| reject(StatusCode::UNAUTHORIZED, "Invalid Authorization header"))?;

        let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            )
        })?;

        let claims = validate_jwt(token, &secret)
            .map_err(|e| reject(StatusCode::UNAUTHORIZED, e.0.to_string()))?;

        if claims.sub.trim().is_empty() {
            return Err(reject(StatusCode::UNAUTHORIZED, "Missing subject in token"));
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests;
