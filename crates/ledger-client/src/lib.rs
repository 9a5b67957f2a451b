//! Ledger database client.
//!
//! This crate sends query expressions to the database's HTTP endpoint and
//! decodes the answers.
//!
//! # Example
//!
//! ```no_run
//! use ledger_client::LedgerClient;
//! use ledger_query::expr::{database, exists};
//!
//! # async fn example() -> Result<(), ledger_client::ClientError> {
//! let admin = LedgerClient::new("http://127.0.0.1:8443", "secret")?;
//!
//! let found = admin.query(&exists(database("LedgerExample"))).await?;
//! println!("database exists: {found}");
//!
//! // A session bound to a database-scoped key shares the admin connection pool.
//! let session = admin.session("fnAC...");
//! # let _ = session;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;

pub use client::{ClientOptions, LedgerClient};
pub use error::{ClientError, ServiceError, INSTANCE_NOT_FOUND, INSTANCE_NOT_UNIQUE};
