//! Ledger database demo.
//!
//! Provisions a database through an administrative client, then works on a
//! single customer document through a database-scoped session:
//!
//! 1. Recreate the database (drop if present, then create)
//! 2. Mint a `server` key for it and open a session
//! 3. Create the `customers` and `transactions` collections
//! 4. Create the `customer_by_id` unique index on `data.id`
//! 5. Create, read, update and re-read a customer
//! 6. Withdraw from the customer's balance in a single guarded request
//!
//! Any failed request ends the run with an error naming the step. A
//! withdrawal that would overdraw the account is not a failure: it yields
//! [`TransferOutcome::InsufficientFunds`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod customers;
pub mod error;
pub mod flow;
pub mod provision;
pub mod transfer;

pub use config::DemoConfig;
pub use error::{DemoError, Result};
pub use flow::{admin_client, run, RunSummary};
pub use transfer::{withdraw, withdrawal_expr, TransferOutcome, INSUFFICIENT_FUNDS};
