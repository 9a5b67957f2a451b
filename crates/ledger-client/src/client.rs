//! Ledger HTTP client implementation.

use std::fmt;
use std::time::Duration;

use ledger_query::{Expr, Value};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use crate::error::{ClientError, ErrorResponse};

/// Ledger database client.
///
/// Every call to [`LedgerClient::query`] is one round trip: the expression is
/// posted to the endpoint and evaluated by the service as a unit.
#[derive(Clone)]
pub struct LedgerClient {
    client: Client,
    endpoint: String,
    secret: String,
}

impl LedgerClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the database (e.g., `"http://127.0.0.1:8443"`)
    /// * `secret` - Key secret used for authentication
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an HTTP(S) URL or the HTTP
    /// client cannot be built.
    pub fn new(endpoint: impl Into<String>, secret: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(endpoint, secret, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an HTTP(S) URL or the HTTP
    /// client cannot be built.
    pub fn with_options(
        endpoint: impl Into<String>,
        secret: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();

        let url = Url::parse(&endpoint)
            .map_err(|e| ClientError::Configuration(format!("invalid endpoint {endpoint}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "unsupported endpoint scheme: {}",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            secret: secret.into(),
        })
    }

    /// A client for the same endpoint authenticated with another secret.
    ///
    /// The new client shares this client's connection pool.
    #[must_use]
    pub fn session(&self, secret: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            secret: secret.into(),
        }
    }

    /// The endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Evaluate an expression and return its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service rejects the query,
    /// or the response cannot be decoded.
    pub async fn query(&self, expr: &Expr) -> Result<Value, ClientError> {
        let url = format!("{}/", self.endpoint);
        let body = serde_json::to_vec(expr)?;

        tracing::debug!(endpoint = %self.endpoint, bytes = body.len(), "Sending query");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.secret, Some(""))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the query response and convert errors.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();

        if status.is_success() {
            let body: serde_json::Value = response.json().await?;
            let serde_json::Value::Object(mut fields) = body else {
                return Err(ClientError::UnexpectedResponse(
                    "response body is not an object".to_string(),
                ));
            };
            let resource = fields.remove("resource").ok_or_else(|| {
                ClientError::UnexpectedResponse("response has no resource field".to_string())
            })?;
            return Ok(Value::from_wire(resource)?);
        }

        tracing::debug!(endpoint = %self.endpoint, status = status.as_u16(), "Query rejected");

        // The error body is only informative; a non-JSON body still carries the status.
        let bytes = response.bytes().await?;
        let errors = serde_json::from_slice::<ErrorResponse>(&bytes)
            .map(|body| body.errors)
            .unwrap_or_default();

        Err(ClientError::Service {
            status: status.as_u16(),
            errors,
        })
    }
}

impl fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerClient")
            .field("endpoint", &self.endpoint)
            .field("secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!("ledger-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a request timeout.
    #[must_use]
    pub fn with_timeout_seconds(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            ..Self::default()
        }
    }
}
