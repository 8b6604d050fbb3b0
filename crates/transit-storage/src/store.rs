//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The storage trait the server depends on.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────── Accounts ───────────────────────────────────

    /// Create a new account. The email uniqueness constraint is the final
    /// arbiter of racing creates; the loser gets `AlreadyExists`.
    async fn create_account(&self, params: &CreateAccountParams) -> Result<Account, StoreError>;

    /// Get account by (lowercased) email.
    async fn get_account_by_email(&self, email: &str) -> Result<Account, StoreError>;

    /// Get account by ID.
    async fn get_account_by_id(&self, id: &AccountId) -> Result<Account, StoreError>;

    /// List all accounts, newest first.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Apply a partial update and return the updated record.
    async fn update_account(
        &self,
        id: &AccountId,
        params: &UpdateAccountParams,
    ) -> Result<Account, StoreError>;

    /// Delete an account. The backend enforces the last-admin rule in a
    /// single statement, so racing deletes of the final two admins cannot
    /// both succeed; removing the last remaining admin yields `Conflict`.
    async fn delete_account(&self, id: &AccountId) -> Result<(), StoreError>;

    // ───────────────────────────────── OTP challenges ─────────────────────────────────

    /// Create an OTP challenge, atomically superseding any prior challenge
    /// for the same email (attempts reset to 0, fresh expiry).
    async fn upsert_otp_challenge(
        &self,
        params: &CreateOtpChallengeParams,
    ) -> Result<OtpChallenge, StoreError>;

    /// Get the live OTP challenge for an email address.
    async fn get_otp_challenge(&self, email: &str) -> Result<OtpChallenge, StoreError>;

    /// Increment the failed attempts counter. Returns the new count.
    async fn increment_otp_attempts(&self, id: &OtpChallengeId) -> Result<i32, StoreError>;

    /// Delete an OTP challenge (consumed, attempt-capped, or rolled back).
    async fn delete_otp_challenge(&self, id: &OtpChallengeId) -> Result<(), StoreError>;

    /// Delete all expired OTP challenges. Returns how many were removed.
    async fn delete_expired_otp_challenges(&self) -> Result<u64, StoreError>;
}
