pub mod accounts; // Opaque login/signup wrappers (auth itself is remote)
pub mod config;
pub mod gateway;
pub mod inventory; // Remote inventory store CRUD
pub mod models;
pub mod nutrition;
pub mod pipeline; // Photo batch → reconciliation → commit
pub mod recipe; // Recipe generation + cook committer + macro ledger

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a host application.
///
/// Call once at startup. Respects `RUST_LOG`; falls back to the crate
/// default filter otherwise.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("pantryscan core v{}", config::CRATE_VERSION);
}
