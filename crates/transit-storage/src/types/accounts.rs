//! Account types.

use chrono::{DateTime, Utc};

use super::{AccountId, Role};

/// Account record. `password_hash` is an Argon2id PHC string; the raw
/// passphrase never reaches storage.
#[derive(Clone, Debug)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String, // lowercased, unique
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating an account.
#[derive(Clone, Debug)]
pub struct CreateAccountParams {
    pub name: String,
    pub email: String, // lowercased
    pub password_hash: String,
    pub role: Role,
}

/// Parameters for updating an account. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateAccountParams {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}
