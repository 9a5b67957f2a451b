//! Customer record operations.
//!
//! Every function here is one round trip. Lookups go through the
//! `customer_by_id` unique index, so a key matches at most one document.

use ledger_client::LedgerClient;
use ledger_query::expr::{class, create, get, index, match_term, obj, select, update, Expr};
use ledger_query::{Customer, Record, Ref, Value};
use tracing::info;

use crate::error::{DemoError, Result};

/// Collection holding customer documents.
pub const CUSTOMERS: &str = "customers";

/// Collection reserved for ledger entries.
pub const TRANSACTIONS: &str = "transactions";

/// Unique index from `data.id` to a customer.
pub const CUSTOMER_BY_ID: &str = "customer_by_id";

/// The document matching `key` in the unique index `index_name`.
pub(crate) fn lookup_expr(index_name: &str, key: i64) -> Expr {
    get(match_term(index(index_name), key))
}

/// Create a document in `collection` with the given data.
///
/// # Errors
///
/// Returns an error if the service rejects the request (for instance on a
/// unique index violation).
pub async fn create_record(session: &LedgerClient, collection: &str, data: Expr) -> Result<Record> {
    let query = create(class(collection), obj([("data", data)]));
    let result = session
        .query(&query)
        .await
        .map_err(DemoError::step("create record"))?;
    Record::from_value(result).map_err(DemoError::decode("create record"))
}

/// The unique document matching `key` in `index_name`.
///
/// # Errors
///
/// Returns an error if nothing matches or the service rejects the request.
pub async fn lookup(session: &LedgerClient, index_name: &str, key: i64) -> Result<Record> {
    let result = session
        .query(&lookup_expr(index_name, key))
        .await
        .map_err(DemoError::step("lookup"))?;
    Record::from_value(result).map_err(DemoError::decode("lookup"))
}

/// Merge `data` into the document at `reference`.
///
/// # Errors
///
/// Returns an error if the document does not exist or the service rejects
/// the request.
pub async fn update_record(session: &LedgerClient, reference: &Ref, data: Expr) -> Result<Record> {
    let query = update(reference.into(), obj([("data", data)]));
    let result = session
        .query(&query)
        .await
        .map_err(DemoError::step("update record"))?;
    Record::from_value(result).map_err(DemoError::decode("update record"))
}

/// Create a customer document.
///
/// # Errors
///
/// Returns an error if a customer with the same id exists or the service
/// rejects the request.
pub async fn create_customer(session: &LedgerClient, customer: Customer) -> Result<Record> {
    let record = create_record(session, CUSTOMERS, customer.to_data()).await?;
    info!(
        customer_id = customer.id,
        reference = %record.reference,
        data = %record.data,
        "Created customer"
    );
    Ok(record)
}

/// Read a customer's data by id.
///
/// # Errors
///
/// Returns an error if no customer has this id or the data is malformed.
pub async fn read_customer(session: &LedgerClient, customer_id: i64) -> Result<Customer> {
    let query = select("data", lookup_expr(CUSTOMER_BY_ID, customer_id));
    let data = session
        .query(&query)
        .await
        .map_err(DemoError::step("read customer"))?;

    info!(customer_id, data = %data, "Read customer");
    Customer::from_data(&data).map_err(DemoError::decode("read customer"))
}

/// Overwrite a customer's data, locating the document by id in the same request.
///
/// # Errors
///
/// Returns an error if no customer has this id or the service rejects the
/// request.
pub async fn update_customer(session: &LedgerClient, customer: Customer) -> Result<Record> {
    let query = update(
        select("ref", lookup_expr(CUSTOMER_BY_ID, customer.id)),
        obj([("data", customer.to_data())]),
    );
    let result = session
        .query(&query)
        .await
        .map_err(DemoError::step("update customer"))?;
    let record = Record::from_value(result).map_err(DemoError::decode("update customer"))?;

    info!(customer_id = customer.id, data = %record.data, "Updated customer");
    Ok(record)
}

/// Read a customer's balance by id.
///
/// # Errors
///
/// Returns an error if no customer has this id or the balance is not an
/// integer.
pub async fn read_balance(session: &LedgerClient, customer_id: i64) -> Result<i64> {
    let query = select(["data", "balance"], lookup_expr(CUSTOMER_BY_ID, customer_id));
    let result = session
        .query(&query)
        .await
        .map_err(DemoError::step("read balance"))?;

    info!(customer_id, balance = %result, "Read customer balance");
    balance_of(&result).map_err(DemoError::decode("read balance"))
}

fn balance_of(value: &Value) -> std::result::Result<i64, ledger_query::DecodeError> {
    value
        .as_i64()
        .ok_or_else(|| ledger_query::DecodeError::UnexpectedType {
            path: "data.balance".to_string(),
            expected: "integer",
            found: value.type_name(),
        })
}
