//! Credential store: account validation, hashing, and persistence rules.
//!
//! All passphrase material is hashed through `transit_crypto` before it
//! reaches storage; nothing in this module ever persists or returns a raw
//! passphrase.

use transit_storage::{
    Account, AccountId, CreateAccountParams, Role, Store, StoreError, UpdateAccountParams,
};

use crate::error::ApiError;

/// Minimum passphrase length.
pub const MIN_PASSPHRASE_LEN: usize = 6;

/// Lowercase and trim an email address for storage and lookup.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Require a well-formed address on the institutional domain: a non-empty,
/// whitespace-free local part, exactly one `@`, and the exact domain.
///
/// Anything looser reaches the mail provider and bounces there as a
/// delivery failure instead of a validation error.
pub fn validate_email(email: &str, domain: &str) -> Result<(), ApiError> {
    let invalid = || {
        ApiError::Validation(format!(
            "Please provide a valid @{} email address",
            domain
        ))
    };
    let (local, host) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    // A second `@` or any whitespace in the host also fails this comparison.
    if host != domain {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_passphrase(passphrase: &str) -> Result<(), ApiError> {
    if passphrase.len() < MIN_PASSPHRASE_LEN {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Create an account. The store's uniqueness constraint on email is the
/// final arbiter when two creates race; the loser surfaces a conflict.
pub async fn create_account(
    store: &dyn Store,
    domain: &str,
    name: &str,
    email: &str,
    passphrase: &str,
    role: Role,
) -> Result<Account, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Please provide your name".to_string()));
    }
    let email = normalize_email(email);
    validate_email(&email, domain)?;
    validate_passphrase(passphrase)?;

    let password_hash = transit_crypto::hash_secret(passphrase)?;
    match store
        .create_account(&CreateAccountParams {
            name: name.to_string(),
            email,
            password_hash,
            role,
        })
        .await
    {
        Ok(account) => Ok(account),
        Err(StoreError::AlreadyExists) => {
            Err(ApiError::Conflict("Email already registered".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fields an update may touch. A `Some` passphrase is re-hashed before
/// persistence.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub passphrase: Option<String>,
}

pub async fn update_account(
    store: &dyn Store,
    id: &AccountId,
    update: ProfileUpdate,
) -> Result<Account, ApiError> {
    let name = match update.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ApiError::Validation("Please provide your name".to_string()));
            }
            Some(name)
        }
        None => None,
    };
    let password_hash = match update.passphrase {
        Some(passphrase) => {
            validate_passphrase(&passphrase)?;
            Some(transit_crypto::hash_secret(&passphrase)?)
        }
        None => None,
    };

    match store
        .update_account(
            id,
            &UpdateAccountParams {
                name,
                password_hash,
                role: update.role,
            },
        )
        .await
    {
        Ok(account) => Ok(account),
        Err(StoreError::NotFound) => Err(ApiError::NotFound("User not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Delete an account. The store refuses to remove the last remaining admin;
/// that verdict is authoritative even under concurrent deletes.
pub async fn delete_account(store: &dyn Store, id: &AccountId) -> Result<(), ApiError> {
    match store.delete_account(id).await {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound) => Err(ApiError::NotFound("User not found".to_string())),
        Err(StoreError::Conflict) => Err(ApiError::Conflict(
            "Cannot delete the last admin user".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
