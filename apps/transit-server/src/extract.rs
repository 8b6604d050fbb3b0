//! Bearer-token authentication for protected routes.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use transit_storage::{Account, AccountId, Store, StoreError};

use crate::error::ApiError;
use crate::server::TransitServer;
use crate::token;

/// The authenticated caller, resolved from the live store.
pub struct AuthAccount(pub Account);

/// Resolve an `Authorization` header value to a live account.
///
/// A token whose embedded role no longer matches the account's current role
/// is rejected; privilege must not persist across a role change.
pub async fn authenticate(
    server: &TransitServer,
    header_value: Option<&str>,
) -> Result<Account, ApiError> {
    let token = header_value
        .and_then(token::extract_bearer)
        .ok_or(ApiError::MissingToken)?;
    let claims = token::verify(token, &server.config.auth)?;
    let id = Uuid::try_parse(&claims.sub).map_err(|_| ApiError::MalformedToken)?;

    let account = match server.store.get_account_by_id(&AccountId(id)).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => return Err(ApiError::AccountGone),
        Err(e) => return Err(e.into()),
    };

    if account.role.as_str() != claims.role {
        return Err(ApiError::RoleMismatch);
    }

    Ok(account)
}

impl FromRequestParts<Arc<TransitServer>> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<TransitServer>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        authenticate(state, header).await.map(AuthAccount)
    }
}
