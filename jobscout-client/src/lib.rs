//! JobScout HTTP Client
//!
//! A type-safe client for the JobScout API, shared by the CLI and anything
//! else that drives the job-search workflow.
//!
//! The crate is layered:
//! - [`ApiClient`]: the JSON transport and one method per endpoint
//! - [`poller`]: the task-polling state machine for long-running work
//! - [`state`]: client-side state with a staleness guard per flow
//! - [`flows`]: the user-facing operations (upload, search, kit, form fill)
//!
//! # Example
//!
//! ```no_run
//! use jobscout_client::{ApiClient, ClientState, PollConfig};
//! use jobscout_client::flows::search::{SearchRequest, run_search};
//! use jobscout_client::poller::NoProgress;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new("http://localhost:3000");
//!     let state = ClientState::default();
//!
//!     let results = run_search(
//!         &client,
//!         &PollConfig::default(),
//!         &state,
//!         SearchRequest::new("backend engineer"),
//!         &NoProgress,
//!     )
//!     .await?;
//!
//!     println!("Found {} job(s)", results.len());
//!     Ok(())
//! }
//! ```

pub mod endpoints;
pub mod error;
pub mod flows;
mod forms;
mod jobs;
mod kits;
pub mod poller;
mod resume;
pub mod state;
mod tasks;

// Re-export commonly used types
pub use endpoints::Endpoints;
pub use error::{ClientError, FlowError, FlowResult, Result};
pub use poller::{PollConfig, PollOutcome, TaskPoller};
pub use reqwest::Method;
pub use state::{ClientState, Flow, StateSnapshot};

use reqwest::{Client, Url};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::GENERIC_API_FAILURE;

/// HTTP client for the JobScout API
///
/// Endpoint methods are organized into logical groups:
/// - Résumé upload
/// - Job search and saved jobs
/// - Kit generation and saved kits
/// - Form filling
/// - Task status
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL of the API (e.g., "https://api.example.com/prod")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Route table
    endpoints: Endpoints,
}

impl ApiClient {
    /// Create a new API client with the default route table
    ///
    /// # Example
    /// ```
    /// use jobscout_client::ApiClient;
    ///
    /// let client = ApiClient::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use jobscout_client::ApiClient;
    /// use reqwest::{Client, Url};
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ApiClient::with_client("http://localhost:3000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            endpoints: Endpoints::default(),
        }
    }

    /// Replace the route table
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the route table
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // =============================================================================
    // Transport
    // =============================================================================

    /// Issue a request and return the decoded JSON body
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET or POST for this API)
    /// * `endpoint` - Path relative to the base URL
    /// * `body` - Optional JSON body
    ///
    /// # Errors
    /// * [`ClientError::Transport`] when no response was received
    /// * [`ClientError::Api`] for a non-success status, carrying the body's
    ///   `error` or `message` field
    /// * [`ClientError::Parse`] when a success body is not JSON
    pub async fn call(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        self.send(method, endpoint, &[], body).await
    }

    /// Like [`ApiClient::call`], decoding the body into `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        self.send(method, endpoint, &[], body).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T> {
        let url = self.url(endpoint)?;
        self.send_to(method, url, query, body).await
    }

    /// Absolute URL of an endpoint path
    fn url(&self, endpoint: &str) -> Result<Url> {
        let url = format!("{}{}", self.base_url, endpoint);
        Url::parse(&url)
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid URL {}: {}", url, e)))
    }

    async fn send_to<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T> {
        debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        debug!("{} {} -> {}", method, url, response.status());

        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(
                status.as_u16(),
                error_message(&error_text),
            ));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Serialize a request DTO into a JSON body
fn to_body<B: Serialize>(body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode request body: {}", e)))
}

/// Picks the human-readable message out of an error body
///
/// Uses the `error` field, then the `message` field, then a generic text.
fn error_message(body: &str) -> String {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return GENERIC_API_FAILURE.to_string();
    };

    ["error", "message"]
        .iter()
        .filter_map(|key| fields.get(*key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| GENERIC_API_FAILURE.to_string())
}
