//! Server state and route table.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use transit_storage::Store;

use crate::config::ServerConfig;
use crate::email::EmailProvider;
use crate::handlers;

/// Shared state for all request handlers. Built once at startup, immutable
/// thereafter.
pub struct TransitServer {
    pub store: Arc<dyn Store>,
    pub config: ServerConfig,
    pub email_provider: Option<Arc<dyn EmailProvider>>,
}

impl TransitServer {
    pub fn new(
        store: Arc<dyn Store>,
        config: ServerConfig,
        email_provider: Option<Arc<dyn EmailProvider>>,
    ) -> Self {
        Self {
            store,
            config,
            email_provider,
        }
    }
}

/// Build the application router.
pub fn router(server: Arc<TransitServer>) -> Router {
    // The SPA is served from a different origin; reflect-all CORS is fine
    // for a bearer-token API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/send-otp", post(handlers::auth::send_otp))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route("/healthz", get(health_handler))
        .layer(cors)
        .with_state(server)
}

async fn health_handler() -> &'static str {
    "ok"
}
