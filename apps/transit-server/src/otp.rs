//! OTP ledger: short-lived, attempt-limited verification codes keyed by
//! email.
//!
//! Only a digest of each code is stored; the plaintext exists just long
//! enough to hand to the notification gateway. At most one live challenge
//! exists per email - issuing again supersedes the previous challenge
//! atomically via the backend's upsert.

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use transit_storage::{CreateOtpChallengeParams, Store, StoreError};

use crate::email::generate_otp_code;
use crate::error::ApiError;
use crate::server::TransitServer;

/// Maximum verification attempts per challenge.
pub const MAX_ATTEMPTS: i32 = 5;

/// Absolute challenge lifetime (not sliding).
pub const CHALLENGE_TTL_MINUTES: i64 = 30;

/// Bound on the notification gateway call; a hung SMTP connection must not
/// hang the registration request.
const SEND_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Issue a fresh challenge for `email` and deliver the code.
///
/// If delivery fails or times out the challenge is rolled back: a code must
/// never be "issued" without a real, delivered notification.
pub async fn issue(server: &TransitServer, email: &str, name: &str) -> Result<(), ApiError> {
    let (Some(provider), Some(email_config)) =
        (server.email_provider.as_ref(), server.config.email.as_ref())
    else {
        return Err(ApiError::Delivery(
            "Email provider not configured. Contact your administrator.".to_string(),
        ));
    };

    let code = generate_otp_code();
    let code_hash = transit_crypto::hash_secret(&code)?;

    let challenge = server
        .store
        .upsert_otp_challenge(&CreateOtpChallengeParams {
            email: email.to_string(),
            code_hash,
            expires_at: Utc::now() + Duration::minutes(CHALLENGE_TTL_MINUTES),
        })
        .await?;

    let send = provider.send_otp(
        email,
        name,
        &code,
        &email_config.from_address,
        email_config.from_name.as_deref(),
    );
    let failure = match tokio::time::timeout(SEND_TIMEOUT, send).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(_) => Some("send timed out".to_string()),
    };

    if let Some(reason) = failure {
        tracing::warn!(email, %reason, "OTP delivery failed; rolling back challenge");
        let _ = server.store.delete_otp_challenge(&challenge.id).await;
        return Err(ApiError::Delivery(
            "Failed to send verification email. Please try again later.".to_string(),
        ));
    }

    Ok(())
}

/// Verify a candidate code against the live challenge for `email`.
///
/// Expired challenges and absent challenges are indistinguishable to the
/// caller. A challenge is deleted on success, on hitting the attempt cap,
/// and on expiry.
pub async fn verify(server: &TransitServer, email: &str, candidate: &str) -> Result<(), ApiError> {
    let challenge = match server.store.get_otp_challenge(email).await {
        Ok(challenge) => challenge,
        Err(StoreError::NotFound) => {
            return Err(ApiError::NotFound("OTP not found or expired".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    if challenge.expires_at < Utc::now() {
        let _ = server.store.delete_otp_challenge(&challenge.id).await;
        return Err(ApiError::NotFound("OTP not found or expired".to_string()));
    }

    if challenge.attempts >= MAX_ATTEMPTS {
        let _ = server.store.delete_otp_challenge(&challenge.id).await;
        return Err(ApiError::AttemptsExceeded);
    }

    let attempts = match server.store.increment_otp_attempts(&challenge.id).await {
        Ok(attempts) => attempts,
        // Superseded by a concurrent re-issue between read and increment
        Err(StoreError::NotFound) => {
            return Err(ApiError::NotFound("OTP not found or expired".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    if !transit_crypto::verify_secret(candidate, &challenge.code_hash)? {
        if attempts >= MAX_ATTEMPTS {
            let _ = server.store.delete_otp_challenge(&challenge.id).await;
            return Err(ApiError::AttemptsExceeded);
        }
        return Err(ApiError::InvalidCode);
    }

    server.store.delete_otp_challenge(&challenge.id).await?;
    Ok(())
}
