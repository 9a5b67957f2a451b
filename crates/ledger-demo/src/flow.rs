//! The end-to-end demo run.

use ledger_client::{ClientOptions, LedgerClient};
use ledger_query::Customer;
use tracing::info;

use crate::config::DemoConfig;
use crate::customers::{
    create_customer, read_balance, read_customer, update_customer, CUSTOMERS, CUSTOMER_BY_ID,
    TRANSACTIONS,
};
use crate::error::{DemoError, Result};
use crate::provision::{create_collections, create_unique_index, open_session, recreate_database};
use crate::transfer::{withdraw, TransferOutcome};

/// What a completed run observed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Name of the database that was recreated.
    pub database: String,
    /// Customer data read after the update step.
    pub updated: Customer,
    /// Outcome of the withdrawal.
    pub transfer: TransferOutcome,
    /// Balance read after the withdrawal.
    pub final_balance: i64,
}

/// Build the administrative client for `config`.
///
/// # Errors
///
/// Returns an error if the endpoint is invalid.
pub fn admin_client(config: &DemoConfig) -> Result<LedgerClient> {
    LedgerClient::with_options(
        &config.endpoint,
        &config.admin_secret,
        ClientOptions::with_timeout_seconds(config.request_timeout_seconds),
    )
    .map_err(DemoError::step("connect"))
}

/// Run every step in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first step's error; later steps are not attempted.
pub async fn run(config: &DemoConfig) -> Result<RunSummary> {
    let admin = admin_client(config)?;
    info!(endpoint = admin.endpoint(), "Connected");

    recreate_database(&admin, &config.database).await?;
    let session = open_session(&admin, &config.database).await?;

    create_collections(&session, &[CUSTOMERS, TRANSACTIONS]).await?;
    create_unique_index(&session, CUSTOMER_BY_ID, CUSTOMERS, &["data", "id"]).await?;

    let customer_id = config.customer_id;
    create_customer(&session, Customer::new(customer_id, config.initial_balance)).await?;
    read_customer(&session, customer_id).await?;

    update_customer(&session, Customer::new(customer_id, config.updated_balance)).await?;
    let updated = Customer::new(customer_id, read_balance(&session, customer_id).await?);

    let transfer = withdraw(&session, customer_id, config.withdrawal).await?;
    let final_balance = read_balance(&session, customer_id).await?;

    info!(
        database = %config.database,
        customer_id,
        final_balance,
        applied = transfer.is_applied(),
        "Demo complete"
    );

    Ok(RunSummary {
        database: config.database.clone(),
        updated,
        transfer,
        final_balance,
    })
}
