//! HTTP handlers and response envelopes.

pub mod auth;
pub mod users;

use serde::Serialize;
use transit_storage::Account;

/// Public profile fields. The credential secret never leaves the server.
#[derive(Debug, Serialize)]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: &'static str,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.0.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: AccountProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: AccountProfile,
}
