//! metricboard - Metrics Dashboard Frontend
//!
//! Serves the metric series list and metric detail views, backed by a
//! metrics API.

mod api;
mod config;
mod prefs;
mod urlstate;
mod views;
mod web;
mod widgets;

use config::ServerConfig;
use views::default_registry;
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("metricboard=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting metricboard on port {}...", cfg.http_port);
    tracing::info!("Using metrics API at {}", cfg.api_base_url);

    // Build the view registry
    let registry = Arc::new(default_registry());

    // Start web server
    let server = Server::new(cfg, registry);
    server.start().await?;

    Ok(())
}
