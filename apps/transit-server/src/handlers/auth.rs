//! Registration and login flow.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use transit_storage::{Role, Store, StoreError};

use super::{AuthResponse, MessageResponse, ProfileResponse};
use crate::accounts;
use crate::error::ApiError;
use crate::extract::AuthAccount;
use crate::otp;
use crate::server::TransitServer;
use crate::token;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub otp: String,
    // Any `role` field in the body is deliberately ignored;
    // self-registration always yields a student account.
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/send-otp (public)
///
/// Registration "Start": reject claimed emails, then issue a challenge and
/// deliver the code.
pub async fn send_otp(
    State(server): State<Arc<TransitServer>>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.email.trim().is_empty() || req.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide both email and name".to_string(),
        ));
    }

    let email = accounts::normalize_email(&req.email);
    accounts::validate_email(&email, &server.config.auth.email_domain)?;

    match server.store.get_account_by_email(&email).await {
        Ok(_) => return Err(ApiError::Conflict("Email already registered".to_string())),
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    otp::issue(&server, &email, req.name.trim()).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
    }))
}

/// POST /api/auth/register (public)
///
/// Registration "Finish": re-check the email is still unclaimed (guards the
/// race between start and finish), consume the OTP challenge, create the
/// account, and hand back a session token.
pub async fn register(
    State(server): State<Arc<TransitServer>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.password.is_empty()
        || req.otp.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Please provide all required fields".to_string(),
        ));
    }

    let email = accounts::normalize_email(&req.email);
    // Validate shape before consuming the challenge; a bad passphrase
    // shouldn't burn a verification attempt.
    accounts::validate_email(&email, &server.config.auth.email_domain)?;
    accounts::validate_passphrase(&req.password)?;

    match server.store.get_account_by_email(&email).await {
        Ok(_) => return Err(ApiError::Conflict("Email already registered".to_string())),
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    otp::verify(&server, &email, req.otp.trim()).await?;

    let account = accounts::create_account(
        server.store.as_ref(),
        &server.config.auth.email_domain,
        &req.name,
        &email,
        &req.password,
        Role::Student,
    )
    .await?;

    let token = token::issue(&account, &server.config.auth)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: (&account).into(),
        }),
    ))
}

/// POST /api/auth/login (public)
///
/// The failure message is identical for unknown email and wrong passphrase;
/// which one failed is not disclosed.
pub async fn login(
    State(server): State<Arc<TransitServer>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Please provide email and password".to_string(),
        ));
    }

    let email = accounts::normalize_email(&req.email);
    let account = match server.store.get_account_by_email(&email).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => return Err(ApiError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };

    if !transit_crypto::verify_secret(&req.password, &account.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = token::issue(&account, &server.config.auth)?;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: (&account).into(),
    }))
}

/// GET /api/auth/me (bearer token)
pub async fn me(AuthAccount(account): AuthAccount) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        success: true,
        user: (&account).into(),
    })
}
