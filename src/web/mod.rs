//! Web server module.

pub mod handlers;

use crate::api::ApiClient;
use crate::config::ServerConfig;
use crate::views::ViewRegistry;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub api: ApiClient,
    pub registry: Arc<ViewRegistry>,
}

/// Web server for metricboard.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, registry: Arc<ViewRegistry>) -> Self {
        let api = ApiClient::new(&config.api_base_url);
        Self {
            state: AppState {
                config,
                api,
                registry,
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            // Views
            .route("/metrics/{metric}", get(handlers::handle_metric_detail))
            .route("/metrics/{metric}/series", get(handlers::handle_series_list))
            // Controls
            .route(
                "/metrics/{metric}/timerange",
                post(handlers::handle_timerange_submit),
            )
            .route(
                "/metrics/{metric}/series/timerange",
                post(handlers::handle_timerange_submit),
            )
            .route(
                "/metrics/{metric}/series/filter",
                post(handlers::handle_filter_submit),
            )
            // Pages
            .route("/metrics/{metric}/embed", get(handlers::handle_embed))
            // Static assets
            .route("/favicon.ico", get(handlers::handle_favicon))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
