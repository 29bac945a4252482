use super::*;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::api_server::{errors, evaluate, predict};
use crate::util::msg::StatusResponse;
use tracing::info;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

impl ApiServer {
    pub async fn run_api_server(self: Arc<Self>, addr: &str) -> Result<()> {
        let app = self.create_api_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("API server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(Into::into)
    }

    // Create API Router
    pub fn create_api_router(self: Arc<Self>) -> Router {
        let state = Arc::clone(&self);
        Router::new()
            .route("/", get(root))
            // Forecast APIs
            .route("/predict", post(predict::predict))
            .route("/predict/terminal", post(predict::predict_terminal))
            .route("/predict/kantor", post(predict::predict_kantor))
            // Evaluation APIs
            .route("/classify", post(evaluate::classify))
            .route("/evaluate", post(evaluate::evaluate))
            .route("/evaluate/terminal", post(evaluate::evaluate_terminal))
            .route("/evaluate/kantor", post(evaluate::evaluate_kantor))
            .layer(CatchPanicLayer::custom(errors::panic_response))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "API Prediksi Energi berjalan",
    })
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!("Failed to install signal handlers: {}", e);
                    return std::future::pending().await;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down gracefully...");
        }
    }
}
