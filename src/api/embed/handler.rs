// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embedding/general HTTP handler

use crate::api::embed::EmbeddingRequest;
use crate::api::http_server::AppState;
use crate::api::{ApiError, ResponseEnvelope};
use crate::service::EmbeddingVector;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{info_span, warn, Instrument};

/// POST /embedding/general handler
///
/// # Request Body
/// ```json
/// { "sentence": "Hello world", "type": "generalist" }
/// ```
///
/// # Response Body
/// ```json
/// { "success": true, "message": "Successfully generated embedding", "data": [0.1, 0.2, ...] }
/// ```
///
/// Rejected bodies and invalid sentences return 400 before the service is
/// called; encoder failures return 502, an unloaded variant 503.
pub async fn general_embedding_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbeddingRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope<EmbeddingVector>>, ApiError> {
    let span = info_span!(
        "route.embedding.general",
        http.method = "POST",
        http.route = "/embedding/general"
    );

    async move {
        let Json(request) = payload.map_err(|rejection| {
            let err = ApiError::from(rejection);
            warn!("Rejected embedding request body: {}", err);
            err
        })?;

        request
            .validate(state.settings.max_sentence_chars)
            .inspect_err(|err| warn!("Invalid embedding request: {}", err))?;

        let vector = state
            .service
            .embed(&request.sentence, request.model_type)
            .await
            .map_err(ApiError::from)?;

        Ok::<_, ApiError>(Json(ResponseEnvelope::success(
            "Successfully generated embedding",
            vector,
        )))
    }
    .instrument(span)
    .await
}
