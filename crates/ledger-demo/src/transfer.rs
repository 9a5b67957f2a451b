//! Guarded withdrawal.
//!
//! The read, the balance check and the write travel as one expression, so
//! the service evaluates them together. When funds are short the service
//! answers with [`INSUFFICIENT_FUNDS`] instead of a document; that is a
//! successful response, not an error.

use ledger_client::LedgerClient;
use ledger_query::expr::{gte, if_then_else, let_in, obj, select, subtract, update, var, Expr};
use ledger_query::{DecodeError, Record, Value};
use tracing::{info, instrument, warn};

use crate::customers::{lookup_expr, CUSTOMER_BY_ID};
use crate::error::{DemoError, Result};

/// Value the service returns when a withdrawal would overdraw the account.
pub const INSUFFICIENT_FUNDS: &str = "Error. Insufficient funds.";

/// Result of a withdrawal request.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// The balance was updated; carries the updated document.
    Applied(Record),
    /// The balance was left untouched.
    InsufficientFunds,
}

impl TransferOutcome {
    /// Classify a withdrawal response by its shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither the sentinel string nor a
    /// document.
    pub fn from_value(value: Value) -> std::result::Result<Self, DecodeError> {
        match value {
            Value::Str(s) if s == INSUFFICIENT_FUNDS => Ok(Self::InsufficientFunds),
            Value::Object(_) => Record::from_value(value).map(Self::Applied),
            other => Err(DecodeError::UnexpectedType {
                path: String::new(),
                expected: "document or insufficient funds marker",
                found: other.type_name(),
            }),
        }
    }

    /// Whether the balance was updated.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// The withdrawal expression.
///
/// Each binding is visible only inside its own `in` body:
///
/// ```text
/// let customer = get(match(customer_by_id, id)) in
///   let origBalance = customer.data.balance in
///     let newBalance = origBalance - amount in
///       if newBalance >= 0 then update(customer.ref, {data: {balance: newBalance}})
///       else "Error. Insufficient funds."
/// ```
#[must_use]
pub fn withdrawal_expr(index_name: &str, customer_id: i64, amount: i64) -> Expr {
    let apply = update(
        select("ref", var("customer")),
        obj([("data", obj([("balance", var("newBalance"))]))]),
    );

    let_in(
        "customer",
        lookup_expr(index_name, customer_id),
        let_in(
            "origBalance",
            select(["data", "balance"], var("customer")),
            let_in(
                "newBalance",
                subtract(var("origBalance"), amount),
                if_then_else(gte(var("newBalance"), 0), apply, INSUFFICIENT_FUNDS),
            ),
        ),
    )
}

/// Withdraw `amount` from a customer, leaving the balance untouched when it
/// would go negative.
///
/// # Errors
///
/// Returns an error if the request fails or the response is neither a
/// document nor the insufficient funds marker. Insufficient funds is not an
/// error.
#[instrument(skip(session))]
pub async fn withdraw(session: &LedgerClient, customer_id: i64, amount: i64) -> Result<TransferOutcome> {
    let query = withdrawal_expr(CUSTOMER_BY_ID, customer_id, amount);
    let result = session
        .query(&query)
        .await
        .map_err(DemoError::step("withdraw"))?;
    let outcome = TransferOutcome::from_value(result).map_err(DemoError::decode("withdraw"))?;

    match &outcome {
        TransferOutcome::Applied(record) => {
            info!(customer_id, amount, data = %record.data, "Withdrawal applied");
        }
        TransferOutcome::InsufficientFunds => {
            warn!(customer_id, amount, "{INSUFFICIENT_FUNDS}");
        }
    }
    Ok(outcome)
}
