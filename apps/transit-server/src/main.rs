mod accounts;
mod config;
mod email;
mod error;
mod extract;
mod handlers;
mod otp;
mod server;
mod token;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use transit_storage::{Role, Store};
use transit_store_sqlite::SqliteStore;

use config::ServerConfig;
use server::TransitServer;

/// How often expired OTP challenges are swept from storage.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

// ────────────────────────────────────── CLI Types ──────────────────────────────────────

#[derive(Parser)]
#[command(name = "transit-server")]
#[command(about = "Campus transit server CLI for administration and serving")]
struct Cli {
    /// Database URL (sqlite://path/to/db.db)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST server
    Serve {
        /// Server address
        #[arg(long, default_value = "0.0.0.0:5000")]
        addr: String,
    },
    /// Admin account management commands
    Admin {
        #[command(subcommand)]
        admin_cmd: AdminCommand,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Create an admin account (for bootstrapping a fresh deployment)
    Create {
        /// Admin email on the institutional domain
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Passphrase (prefer the environment variable over the flag)
        #[arg(long, env = "TRANSIT_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let db_url = cli
        .database_url
        .unwrap_or_else(|| "sqlite://transit.db?mode=rwc".to_string());

    match cli.command {
        Command::Serve { addr } => cmd_serve(&db_url, &addr).await?,
        Command::Admin { admin_cmd } => match admin_cmd {
            AdminCommand::Create {
                email,
                name,
                password,
            } => cmd_admin_create(&db_url, &email, &name, &password).await?,
        },
    }

    Ok(())
}

// ────────────────────────────────────── Commands ──────────────────────────────────────

async fn cmd_serve(db_url: &str, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let store: Arc<dyn Store> = Arc::new(SqliteStore::open(db_url).await?);

    let email_provider: Option<Arc<dyn email::EmailProvider>> = match config.email.as_ref() {
        Some(email_config) => Some(Arc::from(email::create_provider(email_config)?)),
        None => {
            tracing::warn!("no email provider configured; OTP issuance will fail until one is set");
            None
        }
    };

    // Housekeeping: expired challenges are unverifiable either way, but
    // sweeping keeps the table from accumulating dead rows.
    let sweep_store = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sweep_store.delete_expired_otp_challenges().await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(removed = n, "swept expired OTP challenges"),
                Err(e) => tracing::warn!(error = %e, "OTP sweep failed"),
            }
        }
    });

    let transit = Arc::new(TransitServer::new(store, config, email_provider));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("transit-server listening on {}", listener.local_addr()?);

    axum::serve(listener, server::router(transit))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn cmd_admin_create(
    db_url: &str,
    admin_email: &str,
    name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open(db_url).await?;
    let domain = config::email_domain_from_env();

    let account =
        accounts::create_account(&store, &domain, name, admin_email, password, Role::Admin).await?;

    println!("✓ Admin account created!\n");
    println!("Email: {}", account.email);
    println!("Name:  {}", account.name);
    println!("Role:  {}", account.role);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
