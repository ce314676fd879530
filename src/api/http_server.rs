// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::embed::{general_embedding_handler, DEFAULT_MAX_SENTENCE_CHARS};
use crate::api::handlers::{
    health_check_handler, method_not_allowed_handler, models_handler, not_found_handler,
    root_handler,
};
use crate::api::ApiError;
use crate::service::EmbeddingService;
use anyhow::{Context, Result};
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Limits applied by the HTTP layer
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub max_sentence_chars: usize,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            max_sentence_chars: DEFAULT_MAX_SENTENCE_CHARS,
            request_timeout: Duration::from_secs(180),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Router state: the embedding service built once at startup
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EmbeddingService>,
    pub settings: Arc<HttpSettings>,
}

impl AppState {
    pub fn new(service: EmbeddingService, settings: HttpSettings) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let settings = Arc::clone(&state.settings);

    Router::new()
        .route("/", get(root_handler).fallback(method_not_allowed_handler))
        .route(
            "/health-check",
            get(health_check_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/embedding/general",
            post(general_embedding_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/embedding/models",
            get(models_handler).fallback(method_not_allowed_handler),
        )
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(settings.request_timeout)),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turns errors raised by the tower middleware into error envelopes
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        warn!("Request timed out");
        ApiError::Timeout
    } else {
        warn!("Middleware error: {}", err);
        ApiError::ServiceUnavailable(format!("Request could not be processed: {}", err))
    }
}

/// Serves the API until Ctrl+C or SIGTERM
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down gracefully..."),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }
}
