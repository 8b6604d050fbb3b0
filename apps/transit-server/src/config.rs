//! Server configuration, loaded from environment variables.
//!
//! ```bash
//! # Core settings
//! TRANSIT_JWT_SECRET=...            # required to serve
//! TRANSIT_TOKEN_TTL_DAYS=30
//! TRANSIT_EMAIL_DOMAIN=cfd.nu.edu.pk
//!
//! # Provider: SMTP
//! TRANSIT_EMAIL_PROVIDER=smtp
//! SMTP_HOST=smtp.gmail.com
//! SMTP_PORT=587
//! SMTP_USERNAME=user@example.com
//! SMTP_PASSWORD=app_password
//! SMTP_USE_TLS=true
//!
//! # Provider: Resend
//! TRANSIT_EMAIL_PROVIDER=resend
//! RESEND_API_KEY=re_...
//!
//! # Sender config
//! TRANSIT_EMAIL_FROM=noreply@cfd.nu.edu.pk
//! TRANSIT_EMAIL_FROM_NAME="CFD Transport System"
//! ```

use std::env;
use thiserror::Error;

/// Default institutional domain for account emails.
const DEFAULT_EMAIL_DOMAIN: &str = "cfd.nu.edu.pk";

/// Default session token lifetime.
const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub auth: AuthConfig,
    pub email: Option<EmailConfig>,
}

/// Token signing and account validation settings. Initialized once at
/// startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for session token signing.
    pub jwt_secret: String,
    /// Session token lifetime in days.
    pub token_ttl_days: i64,
    /// Institutional domain suffix accounts must belong to (no leading `@`).
    pub email_domain: String,
}

/// Email configuration for OTP delivery.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub provider: EmailProviderConfig,
    /// From email address
    pub from_address: String,
    /// Optional from name
    pub from_name: Option<String>,
}

/// Email provider configuration.
#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    /// Resend email provider
    Resend {
        #[allow(dead_code)] // Used when email-resend feature is enabled
        api_key: String,
    },
    /// SMTP email provider
    Smtp {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        use_tls: bool,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid email provider: {0}. Expected 'resend' or 'smtp'")]
    InvalidProvider(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Invalid token TTL: {0}")]
    InvalidTokenTtl(String),

    #[error("Missing from address: TRANSIT_EMAIL_FROM is required when email is configured")]
    MissingFromAddress,

    #[error("SMTP provider requires SMTP_HOST")]
    SmtpMissingHost,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            auth: AuthConfig::from_env()?,
            email: EmailConfig::from_env()?,
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("TRANSIT_JWT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("TRANSIT_JWT_SECRET".to_string()))?;

        let token_ttl_days = match env::var("TRANSIT_TOKEN_TTL_DAYS") {
            Ok(v) => v
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidTokenTtl(v))?,
            Err(_) => DEFAULT_TOKEN_TTL_DAYS,
        };

        Ok(Self {
            jwt_secret,
            token_ttl_days,
            email_domain: email_domain_from_env(),
        })
    }
}

/// Institutional email domain, also used by the bootstrap CLI (which does
/// not need a signing secret).
pub fn email_domain_from_env() -> String {
    env::var("TRANSIT_EMAIL_DOMAIN")
        .ok()
        .map(|d| d.trim_start_matches('@').to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string())
}

impl EmailConfig {
    /// Load the optional email provider block. `Ok(None)` means OTP delivery
    /// is unconfigured; registration will refuse to issue codes.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(provider_type) = env::var("TRANSIT_EMAIL_PROVIDER").ok() else {
            return Ok(None);
        };

        let provider = match provider_type.to_lowercase().as_str() {
            "resend" => {
                let api_key = env::var("RESEND_API_KEY")
                    .map_err(|_| ConfigError::MissingEnvVar("RESEND_API_KEY".to_string()))?;
                EmailProviderConfig::Resend { api_key }
            }
            "smtp" => {
                let host = env::var("SMTP_HOST").map_err(|_| ConfigError::SmtpMissingHost)?;
                let port = match env::var("SMTP_PORT") {
                    Ok(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidPort(v))?,
                    Err(_) => 587,
                };
                let use_tls = env::var("SMTP_USE_TLS")
                    .map(|v| v.to_lowercase() == "true" || v == "1")
                    .unwrap_or(true);
                EmailProviderConfig::Smtp {
                    host,
                    port,
                    username: env::var("SMTP_USERNAME").ok(),
                    password: env::var("SMTP_PASSWORD").ok(),
                    use_tls,
                }
            }
            other => return Err(ConfigError::InvalidProvider(other.to_string())),
        };

        let from_address =
            env::var("TRANSIT_EMAIL_FROM").map_err(|_| ConfigError::MissingFromAddress)?;

        Ok(Some(Self {
            provider,
            from_address,
            from_name: env::var("TRANSIT_EMAIL_FROM_NAME").ok(),
        }))
    }
}
