//! OTP challenge types for email verification during registration.

use chrono::{DateTime, Utc};

use super::OtpChallengeId;

/// OTP challenge record. At most one live challenge exists per email; the
/// backend enforces this with a uniqueness constraint and upsert semantics.
#[derive(Clone, Debug)]
pub struct OtpChallenge {
    pub id: OtpChallengeId,
    pub email: String,     // Email being verified (lowercased, unique)
    pub code_hash: String, // Argon2id PHC string of the 6-digit code
    pub attempts: i32,     // Failed verification attempts
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Parameters for creating/superseding an OTP challenge.
#[derive(Clone, Debug)]
pub struct CreateOtpChallengeParams {
    pub email: String,             // Email being verified (lowercased)
    pub code_hash: String,         // Argon2id PHC string of the code
    pub expires_at: DateTime<Utc>, // When the code expires
}
