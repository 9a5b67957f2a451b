//! Typed views over stored documents.

use chrono::{DateTime, Utc};

use crate::error::DecodeError;
use crate::expr::{obj, Expr};
use crate::value::{Ref, Value};

/// A stored document: its reference, last-write timestamp and data.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Reference assigned by the database.
    pub reference: Ref,
    /// Last write time in microseconds since the Unix epoch.
    pub ts: Option<i64>,
    /// The document's `data` field.
    pub data: Value,
}

impl Record {
    /// Decode a document returned by `create`, `update` or `get`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has no `ref` or its `ts` is not an integer.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let reference = value.ref_at(&["ref"])?.clone();
        let ts = match value.get("ts") {
            None | Some(Value::Null) => None,
            Some(_) => Some(value.i64_at(&["ts"])?),
        };
        let data = value.get("data").cloned().unwrap_or(Value::Null);

        Ok(Self {
            reference,
            ts,
            data,
        })
    }

    /// Last write time, if the service reported one.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.ts.and_then(DateTime::from_timestamp_micros)
    }

    /// Interpret the data as a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` or `balance` is missing or not an integer.
    pub fn customer(&self) -> Result<Customer, DecodeError> {
        Customer::from_data(&self.data)
    }
}

/// A customer account document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customer {
    /// Externally chosen id, unique through the `customer_by_id` index.
    pub id: i64,
    /// Balance; never driven negative by a withdrawal.
    pub balance: i64,
}

impl Customer {
    /// Create a customer value.
    #[must_use]
    pub const fn new(id: i64, balance: i64) -> Self {
        Self { id, balance }
    }

    /// The document data as an object literal.
    #[must_use]
    pub fn to_data(&self) -> Expr {
        obj([("id", self.id.into()), ("balance", self.balance.into())])
    }

    /// Decode from a document's `data` field.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` or `balance` is missing or not an integer.
    pub fn from_data(data: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: data.i64_at(&["id"])?,
            balance: data.i64_at(&["balance"])?,
        })
    }
}
