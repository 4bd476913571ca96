//! Metrics API client and payload models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fetch error types.
///
/// Every failure surfaces through the same error page; there is no retry
/// and no distinction between 4xx and 5xx.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// The raw detail text handed to the error renderer. For a non-200
    /// response this is the literal response body.
    pub fn detail(&self) -> &str {
        match self {
            FetchError::Network(msg) => msg,
            FetchError::Status { body, .. } => body,
            FetchError::Decode(msg) => msg,
        }
    }
}

/// Server-returned collection of named series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPayload {
    #[serde(default)]
    pub series: Vec<Series>,
}

/// One named time-indexed sequence of numeric values with optional
/// per-point summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub series_id: String,
    #[serde(default)]
    pub time: Vec<i64>,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summaries: Option<serde_json::Value>,
}

/// Client for the metrics API backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the series of a metric for the series list view.
    pub async fn fetch_series(&self, metric_id: &str) -> Result<SeriesPayload, FetchError> {
        self.get("/fetch", metric_id).await
    }

    /// List the series of a metric for the detail view.
    pub async fn list_series(&self, metric_id: &str) -> Result<SeriesPayload, FetchError> {
        self.get("/list_series", metric_id).await
    }

    async fn get(&self, endpoint: &str, metric_id: &str) -> Result<SeriesPayload, FetchError> {
        let url = format!("{}{}?metric_id={}", self.base_url, endpoint, metric_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if status != 200 {
            return Err(FetchError::Status { status, body });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
