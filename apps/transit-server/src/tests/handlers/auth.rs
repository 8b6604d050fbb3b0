//! Registration and login flow tests.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use transit_storage::{Role, Store};

use crate::error::ApiError;
use crate::extract::AuthAccount;
use crate::handlers::auth::{self, LoginRequest, RegisterRequest, SendOtpRequest};
use crate::tests::common::*;

#[tokio::test]
async fn full_registration_flow() {
    let (server, provider) = create_test_server().await;

    auth::send_otp(
        State(server.clone()),
        Json(SendOtpRequest {
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            name: "Ali Raza".to_string(),
        }),
    )
    .await
    .unwrap();
    let code = provider.last_code_for("22i-1234@cfd.nu.edu.pk").unwrap();

    let (status, Json(registered)) = auth::register(
        State(server.clone()),
        Json(RegisterRequest {
            name: "Ali Raza".to_string(),
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
            otp: code,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert!(registered.success);
    assert_eq!(registered.user.role, "student");
    assert!(!registered.token.is_empty());

    // And the new credentials log in.
    let Json(logged_in) = auth::login(
        State(server.clone()),
        Json(LoginRequest {
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(logged_in.user.email, "22i-1234@cfd.nu.edu.pk");
}

#[tokio::test]
async fn registration_ignores_a_role_in_the_request_body() {
    let (server, provider) = create_test_server().await;

    auth::send_otp(
        State(server.clone()),
        Json(SendOtpRequest {
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            name: "Ali Raza".to_string(),
        }),
    )
    .await
    .unwrap();
    let code = provider.last_code_for("22i-1234@cfd.nu.edu.pk").unwrap();

    // A client-supplied role is silently dropped during deserialization.
    let req: RegisterRequest = serde_json::from_value(json!({
        "name": "Ali Raza",
        "email": "22i-1234@cfd.nu.edu.pk",
        "password": "secret-pass",
        "otp": code,
        "role": "admin",
    }))
    .unwrap();

    let (_, Json(registered)) = auth::register(State(server.clone()), Json(req)).await.unwrap();
    assert_eq!(registered.user.role, "student");

    let account = server
        .store
        .get_account_by_email("22i-1234@cfd.nu.edu.pk")
        .await
        .unwrap();
    assert_eq!(account.role, Role::Student);
}

#[tokio::test]
async fn send_otp_requires_email_and_name() {
    let (server, _provider) = create_test_server().await;
    let err = auth::send_otp(
        State(server.clone()),
        Json(SendOtpRequest {
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            name: "".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn send_otp_rejects_claimed_email() {
    let (server, provider) = create_test_server().await;
    create_account_with_role(&server, "Taken", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
        .await;

    let err = auth::send_otp(
        State(server.clone()),
        Json(SendOtpRequest {
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            name: "Ali Raza".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    assert_eq!(provider.sent_count(), 0);
}

#[tokio::test]
async fn register_rejects_email_claimed_after_send() {
    let (server, provider) = create_test_server().await;
    let code = issue_code(&server, &provider, "22i-1234@cfd.nu.edu.pk").await;

    // Someone claims the address between send-otp and register.
    create_account_with_role(&server, "Racer", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
        .await;

    let err = auth::register(
        State(server.clone()),
        Json(RegisterRequest {
            name: "Ali Raza".to_string(),
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
            otp: code,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn register_validates_passphrase_before_consuming_the_code() {
    let (server, provider) = create_test_server().await;
    let code = issue_code(&server, &provider, "22i-1234@cfd.nu.edu.pk").await;

    let err = auth::register(
        State(server.clone()),
        Json(RegisterRequest {
            name: "Ali Raza".to_string(),
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            password: "12345".to_string(),
            otp: code.clone(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // The rejected request burned no attempt; the code still registers.
    auth::register(
        State(server.clone()),
        Json(RegisterRequest {
            name: "Ali Raza".to_string(),
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
            otp: code,
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn login_failure_does_not_reveal_which_credential_was_wrong() {
    let (server, _provider) = create_test_server().await;
    create_account_with_role(&server, "Student", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
        .await;

    let unknown_email = auth::login(
        State(server.clone()),
        Json(LoginRequest {
            email: "ghost@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
        }),
    )
    .await
    .unwrap_err();

    let wrong_password = auth::login(
        State(server.clone()),
        Json(LoginRequest {
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            password: "wrong-pass".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    assert!(matches!(unknown_email, ApiError::InvalidCredentials));
    assert!(matches!(wrong_password, ApiError::InvalidCredentials));
}

#[tokio::test]
async fn responses_never_contain_the_credential_digest() {
    let (server, _provider) = create_test_server().await;
    create_account_with_role(&server, "Student", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
        .await;

    let Json(resp) = auth::login(
        State(server.clone()),
        Json(LoginRequest {
            email: "22i-1234@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
        }),
    )
    .await
    .unwrap();

    let body = serde_json::to_string(&resp).unwrap();
    assert!(!body.contains("password"));
    assert!(!body.contains("$argon2"));
    assert!(!body.contains("secret-pass"));
}

#[tokio::test]
async fn me_returns_the_callers_profile() {
    let (server, _provider) = create_test_server().await;
    let account =
        create_account_with_role(&server, "Student", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
            .await;

    let Json(resp) = auth::me(AuthAccount(account.clone())).await;
    assert!(resp.success);
    assert_eq!(resp.user.id, account.id.0.to_string());
    assert_eq!(resp.user.email, "22i-1234@cfd.nu.edu.pk");
}
