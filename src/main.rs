//! payroll-server - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the payroll API.

use std::path::PathBuf;

use anyhow::Context;
use hospital_payroll::{
    api::{AppState, create_router},
    config::ConfigLoader,
    ledger::{JsonFileLoanStore, LoanLedger},
    runner::AdvanceSource,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/hospital";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hospital_payroll=info,payroll_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading payroll configuration from {}", config_dir))?;
    info!(
        company = %config.company().name,
        version = %config.company().version,
        "Loaded payroll configuration"
    );

    let ledger = match std::env::var_os("PAYROLL_LOAN_STORE") {
        Some(path) => {
            let path = PathBuf::from(path);
            let store = JsonFileLoanStore::open(&path)
                .with_context(|| format!("opening loan store {}", path.display()))?;
            LoanLedger::open(store).context("loading loans")?
        }
        None => {
            info!("PAYROLL_LOAN_STORE not set, loans are kept in memory only");
            LoanLedger::in_memory()
        }
    };

    let state = AppState::new(config, AdvanceSource::Ledger(ledger));
    let app = create_router(state);

    let addr =
        std::env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Starting server on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
