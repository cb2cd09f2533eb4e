//! API Server - HTTP server for the prediction endpoint

use axum::{routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::pipeline::ServiceContext;

/// API server
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(context: Arc<ServiceContext>, addr: String) -> Self {
        let state = Arc::new(AppState { context });
        Self { state, addr }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/predict", post(handlers::predict))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
