//! API Server - HTTP server for the classifier

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use spam_shield::SpamClassifier;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{self, AppState};

/// Build the router with all routes
pub fn router(classifier: Arc<SpamClassifier>, max_body_bytes: usize) -> Router {
    let state = AppState { classifier };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/classify", post(api::classify))
        .route("/normalize", post(api::normalize))
        .route("/model", get(api::model_info));

    Router::new()
        .route("/health", get(api::health))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API Server configuration
pub struct ApiServer {
    classifier: Arc<SpamClassifier>,
    addr: String,
    max_body_bytes: usize,
}

impl ApiServer {
    pub fn new(classifier: Arc<SpamClassifier>, addr: String, max_body_bytes: usize) -> Self {
        Self {
            classifier,
            addr,
            max_body_bytes,
        }
    }

    pub fn router(&self) -> Router {
        router(Arc::clone(&self.classifier), self.max_body_bytes)
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
