//! Common test helpers and utilities for server tests.
//!
//! This module provides shared test infrastructure including:
//! - Test server creation with an in-process capturing email provider
//! - Account creation helpers
//! - OTP issuance helpers that return the delivered code

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use transit_storage::{Account, Role};
use transit_store_sqlite::SqliteStore;

use crate::accounts;
use crate::config::{AuthConfig, EmailConfig, EmailProviderConfig, ServerConfig};
use crate::email::{EmailError, EmailProvider};
use crate::otp;
use crate::server::TransitServer;

/// Institutional domain used throughout the tests.
pub const TEST_DOMAIN: &str = "cfd.nu.edu.pk";

/// Email provider that records every delivery instead of sending it, so
/// tests can read back the code a real user would have received.
pub struct CapturingProvider {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingProvider {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// The most recently delivered code for `email`, if any.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailProvider for CapturingProvider {
    async fn send_otp(
        &self,
        to: &str,
        _recipient_name: &str,
        code: &str,
        _from_address: &str,
        _from_name: Option<&str>,
    ) -> Result<(), EmailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), code.to_string()));
        Ok(())
    }
}

/// Email provider that always fails, for delivery-rollback tests.
pub struct FailingProvider;

#[async_trait]
impl EmailProvider for FailingProvider {
    async fn send_otp(
        &self,
        _to: &str,
        _recipient_name: &str,
        _code: &str,
        _from_address: &str,
        _from_name: Option<&str>,
    ) -> Result<(), EmailError> {
        Err(EmailError::SendFailed("simulated outage".to_string()))
    }
}

/// Test configuration: fixed signing secret, the standard domain, and an
/// email block so OTP issuance is considered configured.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        auth: AuthConfig {
            jwt_secret: "test-signing-secret".to_string(),
            token_ttl_days: 30,
            email_domain: TEST_DOMAIN.to_string(),
        },
        email: Some(EmailConfig {
            provider: EmailProviderConfig::Smtp {
                host: "localhost".to_string(),
                port: 25,
                username: None,
                password: None,
                use_tls: false,
            },
            from_address: "noreply@cfd.nu.edu.pk".to_string(),
            from_name: None,
        }),
    }
}

/// Test helper: TransitServer with in-memory SQLite and a capturing email
/// provider.
pub async fn create_test_server() -> (Arc<TransitServer>, Arc<CapturingProvider>) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let provider = Arc::new(CapturingProvider::new());
    let server = Arc::new(TransitServer::new(
        store,
        test_config(),
        Some(provider.clone() as Arc<dyn EmailProvider>),
    ));
    (server, provider)
}

/// Test helper: TransitServer whose email provider always fails.
pub async fn create_failing_delivery_server() -> Arc<TransitServer> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    Arc::new(TransitServer::new(
        store,
        test_config(),
        Some(Arc::new(FailingProvider) as Arc<dyn EmailProvider>),
    ))
}

/// Test helper: TransitServer with no email provider configured at all.
pub async fn create_unconfigured_server() -> Arc<TransitServer> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let config = ServerConfig {
        email: None,
        ..test_config()
    };
    Arc::new(TransitServer::new(store, config, None))
}

/// Test helper: create an account directly through the credential store,
/// bypassing the OTP flow.
pub async fn create_account_with_role(
    server: &TransitServer,
    name: &str,
    email: &str,
    passphrase: &str,
    role: Role,
) -> Account {
    accounts::create_account(
        server.store.as_ref(),
        TEST_DOMAIN,
        name,
        email,
        passphrase,
        role,
    )
    .await
    .unwrap()
}

/// Test helper: issue an OTP challenge and return the code that was
/// "delivered" through the capturing provider.
pub async fn issue_code(
    server: &TransitServer,
    provider: &CapturingProvider,
    email: &str,
) -> String {
    otp::issue(server, email, "Test User").await.unwrap();
    provider.last_code_for(email).unwrap()
}
