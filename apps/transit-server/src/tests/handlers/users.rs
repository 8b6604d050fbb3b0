//! Admin account management endpoint tests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use transit_storage::{Role, Store};

use crate::error::ApiError;
use crate::extract::AuthAccount;
use crate::handlers::users::{self, CreateUserRequest, UpdateUserRequest};
use crate::tests::common::*;

#[tokio::test]
async fn non_admin_callers_are_forbidden() {
    let (server, _provider) = create_test_server().await;
    let student =
        create_account_with_role(&server, "Student", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
            .await;

    let err = users::list_users(AuthAccount(student.clone()), State(server.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden));

    let err = users::create_user(
        AuthAccount(student),
        State(server.clone()),
        Json(CreateUserRequest {
            name: "Driver".to_string(),
            email: "driver@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
            role: "driver".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden));
}

#[tokio::test]
async fn admin_creates_an_account_with_any_role() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;

    let (status, Json(resp)) = users::create_user(
        AuthAccount(admin),
        State(server.clone()),
        Json(CreateUserRequest {
            name: "Bus Driver".to_string(),
            email: "driver@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
            role: "driver".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp.data.role, "driver");
}

#[tokio::test]
async fn bare_local_part_is_completed_with_the_domain() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;

    let (_, Json(resp)) = users::create_user(
        AuthAccount(admin),
        State(server.clone()),
        Json(CreateUserRequest {
            name: "Student".to_string(),
            email: "22i-9999".to_string(),
            password: "secret-pass".to_string(),
            role: "student".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.data.email, "22i-9999@cfd.nu.edu.pk");
}

#[tokio::test]
async fn unknown_role_is_a_validation_error() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;

    let err = users::create_user(
        AuthAccount(admin),
        State(server.clone()),
        Json(CreateUserRequest {
            name: "X".to_string(),
            email: "x@cfd.nu.edu.pk".to_string(),
            password: "secret-pass".to_string(),
            role: "superuser".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn admin_lists_all_accounts() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;
    create_account_with_role(&server, "Student", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
        .await;

    let Json(resp) = users::list_users(AuthAccount(admin), State(server.clone()))
        .await
        .unwrap();
    assert_eq!(resp.data.len(), 2);
    // The admin view exposes timestamps but never credential material.
    let body = serde_json::to_string(&resp).unwrap();
    assert!(!body.contains("$argon2"));
}

#[tokio::test]
async fn admin_updates_a_role() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;
    let student =
        create_account_with_role(&server, "Student", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
            .await;

    let Json(resp) = users::update_user(
        AuthAccount(admin),
        State(server.clone()),
        Path(student.id.0.to_string()),
        Json(UpdateUserRequest {
            name: None,
            role: Some("driver".to_string()),
            password: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.data.role, "driver");
    let reloaded = server.store.get_account_by_id(&student.id).await.unwrap();
    assert_eq!(reloaded.role, Role::Driver);
}

#[tokio::test]
async fn updating_an_unknown_id_is_not_found() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;

    let err = users::update_user(
        AuthAccount(admin.clone()),
        State(server.clone()),
        Path(uuid::Uuid::now_v7().to_string()),
        Json(UpdateUserRequest {
            name: Some("Ghost".to_string()),
            role: None,
            password: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // A non-UUID id reads the same as an unknown one.
    let err = users::update_user(
        AuthAccount(admin),
        State(server.clone()),
        Path("not-a-uuid".to_string()),
        Json(UpdateUserRequest {
            name: Some("Ghost".to_string()),
            role: None,
            password: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn admin_deletes_an_account() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;
    let student =
        create_account_with_role(&server, "Student", "22i-1234@cfd.nu.edu.pk", "secret-pass", Role::Student)
            .await;

    let Json(resp) = users::delete_user(
        AuthAccount(admin),
        State(server.clone()),
        Path(student.id.0.to_string()),
    )
    .await
    .unwrap();
    assert!(resp.success);
    assert!(server.store.get_account_by_id(&student.id).await.is_err());
}

#[tokio::test]
async fn deleting_the_last_admin_conflicts() {
    let (server, _provider) = create_test_server().await;
    let admin =
        create_account_with_role(&server, "Admin", "admin@cfd.nu.edu.pk", "secret-pass", Role::Admin)
            .await;

    let err = users::delete_user(
        AuthAccount(admin.clone()),
        State(server.clone()),
        Path(admin.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}
