//! Ledger demo - provisions a database and runs a guarded withdrawal.
//!
//! This is the main entry point for the demo.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_demo::{run, DemoConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ledger_demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ledger demo");

    // Load configuration from environment
    let config = DemoConfig::from_env();

    tracing::info!(
        endpoint = %config.endpoint,
        database = %config.database,
        customer_id = config.customer_id,
        withdrawal = config.withdrawal,
        "Demo configuration loaded"
    );

    match run(&config).await {
        Ok(summary) => {
            tracing::info!(
                final_balance = summary.final_balance,
                applied = summary.transfer.is_applied(),
                "Ledger demo finished"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Ledger demo aborted");
            Err(e.into())
        }
    }
}
