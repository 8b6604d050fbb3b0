//! Session token service.
//!
//! Tokens are HS256 JWTs carrying the account id and role. They are
//! integrity-protected, not encrypted; the middleware re-checks the embedded
//! role against the live account on every protected call.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use transit_storage::Account;

use crate::config::AuthConfig;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (UUID string).
    pub sub: String,
    /// Role at issuance time.
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issue a signed session token for an account.
pub fn issue(account: &Account, auth: &AuthConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: account.id.0.to_string(),
        role: account.role.as_str().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(auth.token_ttl_days)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        ApiError::Internal
    })
}

/// Verify a token's signature and expiry, returning its claims.
pub fn verify(token: &str, auth: &AuthConfig) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::ExpiredToken,
        _ => ApiError::MalformedToken,
    })
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
/// Any other shape is a plain `None`; upstream decides how to handle absence.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
