// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::http_server::AppState;
use crate::api::{ApiError, ResponseEnvelope};
use crate::embeddings::ModelInfo;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const WELCOME_MESSAGE: &str = "Welcome to the Machine Learning API";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// GET / liveness message
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health-check
pub async fn health_check_handler() -> Json<HealthResponse> {
    info!("Performing health check...");
    info!("Health check successful");
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /embedding/models: both variants, loaded or not
pub async fn models_handler(State(state): State<AppState>) -> Json<ResponseEnvelope<Vec<ModelInfo>>> {
    Json(ResponseEnvelope::success(
        "Successfully retrieved models",
        state.service.models(),
    ))
}

pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

pub async fn method_not_allowed_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} is not supported on {}", method, uri.path()))
}
