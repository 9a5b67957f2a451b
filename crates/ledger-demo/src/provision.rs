//! Database, key, collection and index provisioning.
//!
//! Provisioning is destructive: [`recreate_database`] drops any existing
//! database of the same name before creating it again.

use ledger_client::LedgerClient;
use ledger_query::expr::{
    arr, class, create_class, create_database, create_index, create_key, database, delete, exists,
    if_then_else, lambda, map, obj, var, Expr,
};
use ledger_query::Value;
use tracing::{info, instrument};

use crate::error::{DemoError, Result};

/// Role given to the database-scoped key.
pub const SERVER_ROLE: &str = "server";

/// Drop the database if it exists, then create it, in one request.
///
/// # Errors
///
/// Returns an error if the service rejects the request.
#[instrument(skip(admin))]
pub async fn recreate_database(admin: &LedgerClient, name: &str) -> Result<Value> {
    let params = || obj([("name", Expr::from(name))]);
    let query = if_then_else(
        exists(database(name)),
        arr([delete(database(name)), create_database(params())]),
        create_database(params()),
    );

    let result = admin
        .query(&query)
        .await
        .map_err(DemoError::step("create database"))?;

    info!(database = name, result = %result, "Created database");
    Ok(result)
}

/// Create a key scoped to `database_name` and return its secret.
///
/// # Errors
///
/// Returns an error if the service rejects the request or the response has
/// no secret.
#[instrument(skip(admin))]
pub async fn create_server_key(admin: &LedgerClient, database_name: &str) -> Result<String> {
    let query = create_key(obj([
        ("database", database(database_name)),
        ("role", SERVER_ROLE.into()),
    ]));

    let result = admin
        .query(&query)
        .await
        .map_err(DemoError::step("create key"))?;
    let secret = result
        .str_at(&["secret"])
        .map_err(DemoError::decode("create key"))?;

    info!(database = database_name, role = SERVER_ROLE, "Created database key");
    Ok(secret.to_string())
}

/// Create a database key and open a session client with it.
///
/// The session shares the admin client's connection pool.
///
/// # Errors
///
/// Returns an error if the key cannot be created.
pub async fn open_session(admin: &LedgerClient, database_name: &str) -> Result<LedgerClient> {
    let secret = create_server_key(admin, database_name).await?;
    Ok(admin.session(secret))
}

/// Create every named collection in one request.
///
/// # Errors
///
/// Returns an error if the service rejects the request.
#[instrument(skip(session))]
pub async fn create_collections(session: &LedgerClient, names: &[&str]) -> Result<Value> {
    let query = map(
        arr(names.iter().map(|name| Expr::from(*name))),
        lambda("c", create_class(obj([("name", var("c"))]))),
    );

    let result = session
        .query(&query)
        .await
        .map_err(DemoError::step("create collections"))?;

    info!(collections = ?names, result = %result, "Created collections");
    Ok(result)
}

/// Create a unique index over `source` keyed by the field at `term_path`.
///
/// # Errors
///
/// Returns an error if the service rejects the request.
#[instrument(skip(session))]
pub async fn create_unique_index(
    session: &LedgerClient,
    name: &str,
    source: &str,
    term_path: &[&str],
) -> Result<Value> {
    let field = arr(term_path.iter().map(|segment| Expr::from(*segment)));
    let query = create_index(obj([
        ("name", Expr::from(name)),
        ("source", class(source)),
        ("unique", true.into()),
        ("terms", arr([obj([("field", field)])])),
    ]));

    let result = session
        .query(&query)
        .await
        .map_err(DemoError::step("create index"))?;

    info!(index = name, source, result = %result, "Created index");
    Ok(result)
}
