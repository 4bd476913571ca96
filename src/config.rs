//! Configuration module for metricboard.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// Base URL of the metrics API backend (default: "http://localhost:8000")
    pub api_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            api_base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `METRICBOARD_HTTP_PORT`: HTTP port (default: 8080)
    /// - `METRICBOARD_API_URL`: metrics API base URL (default: "http://localhost:8000")
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port_str) = env::var("METRICBOARD_HTTP_PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.http_port = port;
            }
        }

        if let Ok(api_base_url) = env::var("METRICBOARD_API_URL") {
            cfg.api_base_url = api_base_url;
        }

        cfg
    }
}
