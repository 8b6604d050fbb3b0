//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use uuid::Uuid;

/// Account identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

/// OTP challenge identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OtpChallengeId(pub Uuid);
