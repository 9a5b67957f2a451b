//! Demo configuration.

use serde::Deserialize;
use std::path::Path;

/// Demo configuration loaded from environment variables and secrets files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Database endpoint (default: `http://127.0.0.1:8443`).
    pub endpoint: String,

    /// Administrative secret (default: "secret").
    pub admin_secret: String,

    /// Name of the database to (re)create (default: "`LedgerExample`").
    pub database: String,

    /// Id of the sample customer (default: 0).
    pub customer_id: i64,

    /// Balance the customer is created with (default: 100).
    pub initial_balance: i64,

    /// Balance written by the update step (default: 200).
    pub updated_balance: i64,

    /// Amount withdrawn by the transfer step (default: 50).
    pub withdrawal: i64,

    /// Request timeout in seconds (default: 30).
    pub request_timeout_seconds: u64,
}

/// Ledger secrets file structure.
#[derive(Debug, Deserialize)]
struct LedgerSecrets {
    #[serde(default)]
    endpoint: Option<String>,
    admin_secret: String,
}

const SECRET_PATHS: [&str; 3] = [
    ".secrets/ledger.json",
    "ledger-demo/.secrets/ledger.json",
    "../.secrets/ledger.json",
];

impl DemoConfig {
    /// Load configuration from environment variables and secrets files.
    ///
    /// The admin secret comes from the first readable `.secrets/ledger.json`,
    /// then `LEDGER_ADMIN_SECRET`. The endpoint comes from `LEDGER_ENDPOINT`,
    /// then the secrets file. Everything else is read from `LEDGER_*`
    /// variables. Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let secrets = SECRET_PATHS.iter().find_map(|path| {
            match load_secrets_file::<LedgerSecrets>(Path::new(path)) {
                Ok(secrets) => {
                    tracing::info!(path = %path, "Loaded ledger secrets from file");
                    Some(secrets)
                }
                Err(SecretsError::Read(_)) => None,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Ignoring unreadable ledger secrets file");
                    None
                }
            }
        });
        if secrets.is_none() {
            tracing::debug!("Ledger secrets file not found, using environment variables");
        }

        Self::from_lookup(secrets, |key| std::env::var(key).ok())
    }

    /// Build configuration from optional file secrets and a variable lookup.
    ///
    /// A file admin secret takes precedence over the lookup; a looked-up
    /// endpoint takes precedence over the file.
    fn from_lookup(secrets: Option<LedgerSecrets>, var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| var(key).and_then(|v| v.trim().parse().ok());

        let (file_endpoint, file_secret) = match secrets {
            Some(s) => (s.endpoint, Some(s.admin_secret)),
            None => (None, None),
        };

        Self {
            endpoint: var("LEDGER_ENDPOINT")
                .or(file_endpoint)
                .unwrap_or(defaults.endpoint),
            admin_secret: file_secret
                .or_else(|| var("LEDGER_ADMIN_SECRET"))
                .unwrap_or(defaults.admin_secret),
            database: var("LEDGER_DATABASE").unwrap_or(defaults.database),
            customer_id: parsed("LEDGER_CUSTOMER_ID").unwrap_or(defaults.customer_id),
            initial_balance: parsed("LEDGER_INITIAL_BALANCE").unwrap_or(defaults.initial_balance),
            updated_balance: parsed("LEDGER_UPDATED_BALANCE").unwrap_or(defaults.updated_balance),
            withdrawal: parsed("LEDGER_WITHDRAWAL").unwrap_or(defaults.withdrawal),
            request_timeout_seconds: var("LEDGER_REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }
}

/// Failure to load a secrets file.
#[derive(Debug, thiserror::Error)]
enum SecretsError {
    #[error("failed to read secrets file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid secrets file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SecretsError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8443".into(),
            admin_secret: "secret".into(),
            database: "LedgerExample".into(),
            customer_id: 0,
            initial_balance: 100,
            updated_balance: 200,
            withdrawal: 50,
            request_timeout_seconds: 30,
        }
    }
}
