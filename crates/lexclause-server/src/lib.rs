//! HTTP boundary: `POST /classify` and `GET /health` over a shared [`Classifier`].

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use lexclause_ai::Classifier;
use lexclause_extract::PdfExtractor;
use tower_http::trace::TraceLayer;
use tracing::info;

mod routes;
pub use routes::{ClassifyRequest, HealthResponse};

/// Base64 PDFs are far larger than the extracted text.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub extractor: Arc<PdfExtractor>,
}

impl AppState {
    pub fn new(classifier: Classifier, extractor: PdfExtractor) -> Self {
        Self {
            classifier: Arc::new(classifier),
            extractor: Arc::new(extractor),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/classify", post(routes::classify))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, "lexclause server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
