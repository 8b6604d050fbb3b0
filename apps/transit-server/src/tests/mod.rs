//! Server unit and integration tests.
//!
//! Tests are organized into modules by feature area:
//! - `common` - Shared test helpers and utilities
//! - `accounts` - Credential store rules (validation, hashing, last-admin)
//! - `otp` - OTP challenge lifecycle tests
//! - `token` - Session token and bearer middleware tests
//! - `handlers` - HTTP handler integration tests

pub mod common;
