//! Admin account management surface.
//!
//! Unlike self-registration, these endpoints may assign any role, and short
//! email local parts are completed with the institutional domain.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use transit_storage::{Account, AccountId, Role, Store};

use super::MessageResponse;
use crate::accounts::{self, ProfileUpdate};
use crate::error::ApiError;
use crate::extract::AuthAccount;
use crate::server::TransitServer;

/// Account view for the admin surface. Includes timestamps, never the
/// credential secret.
#[derive(Debug, Serialize)]
pub struct AdminAccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Account> for AdminAccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.0.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role.as_str(),
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub data: Vec<AdminAccountView>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub data: AdminAccountView,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "student".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

fn require_admin(caller: &Account) -> Result<(), ApiError> {
    if caller.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    Role::from_str(raw).map_err(|_| ApiError::Validation("Invalid role specified".to_string()))
}

fn parse_account_id(raw: &str) -> Result<AccountId, ApiError> {
    Uuid::try_parse(raw)
        .map(AccountId)
        .map_err(|_| ApiError::NotFound("User not found".to_string()))
}

/// Complete a bare local part ("22i-1234") with the institutional domain.
fn complete_email(raw: &str, domain: &str) -> String {
    let raw = raw.trim();
    if raw.contains('@') {
        raw.to_string()
    } else {
        format!("{}@{}", raw, domain)
    }
}

/// GET /api/users (admin)
pub async fn list_users(
    AuthAccount(caller): AuthAccount,
    State(server): State<Arc<TransitServer>>,
) -> Result<Json<UserListResponse>, ApiError> {
    require_admin(&caller)?;
    let accounts = server.store.list_accounts().await?;
    Ok(Json(UserListResponse {
        success: true,
        data: accounts.iter().map(AdminAccountView::from).collect(),
    }))
}

/// POST /api/users (admin)
pub async fn create_user(
    AuthAccount(caller): AuthAccount,
    State(server): State<Arc<TransitServer>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_admin(&caller)?;

    let role = parse_role(&req.role)?;
    let email = complete_email(&req.email, &server.config.auth.email_domain);

    let account = accounts::create_account(
        server.store.as_ref(),
        &server.config.auth.email_domain,
        &req.name,
        &email,
        &req.password,
        role,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            data: (&account).into(),
        }),
    ))
}

/// PUT /api/users/{id} (admin)
pub async fn update_user(
    AuthAccount(caller): AuthAccount,
    State(server): State<Arc<TransitServer>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&caller)?;

    let id = parse_account_id(&id)?;
    let role = req.role.as_deref().map(parse_role).transpose()?;

    let account = accounts::update_account(
        server.store.as_ref(),
        &id,
        ProfileUpdate {
            name: req.name,
            role,
            passphrase: req.password,
        },
    )
    .await?;

    Ok(Json(UserResponse {
        success: true,
        data: (&account).into(),
    }))
}

/// DELETE /api/users/{id} (admin)
pub async fn delete_user(
    AuthAccount(caller): AuthAccount,
    State(server): State<Arc<TransitServer>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&caller)?;

    let id = parse_account_id(&id)?;
    accounts::delete_account(server.store.as_ref(), &id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "User deleted successfully".to_string(),
    }))
}
