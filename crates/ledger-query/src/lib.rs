//! Query expressions and response values for the ledger database.
//!
//! This crate provides the data types shared by the client and the demo flow:
//!
//! - **Expressions**: [`Expr`] and the builder functions in [`expr`], encoded
//!   to the service's JSON wire format through `serde`
//! - **Values**: [`Value`] and [`Ref`], decoded from tagged wire JSON
//!   (`@ref`, `@ts`, `@date`, `@obj`)
//! - **Records**: [`Record`] and [`Customer`], typed views over stored documents
//!
//! # Example
//!
//! ```
//! use ledger_query::expr::{get, index, match_term, select};
//!
//! let query = select(["data", "balance"], get(match_term(index("customer_by_id"), 0)));
//! let wire = serde_json::to_value(&query).unwrap();
//! assert_eq!(wire["select"], serde_json::json!(["data", "balance"]));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod expr;
pub mod record;
pub mod value;

pub use error::DecodeError;
pub use expr::{Expr, Path};
pub use record::{Customer, Record};
pub use value::{Ref, Value};
