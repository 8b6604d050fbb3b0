//! OTP code generation.

use rand::Rng;

/// Generate a 6-digit OTP code with a cryptographically secure RNG.
///
/// Codes are drawn uniformly from [100000, 999999], so they never carry a
/// leading zero.
pub fn generate_otp_code() -> String {
    let mut rng = rand::rng();
    let code: u32 = rng.random_range(100_000..=999_999);
    code.to_string()
}
