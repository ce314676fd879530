// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Service
//!
//! Selects the encoder for the requested `ModelType`, runs it on Tokio's
//! blocking pool and returns the vector as a plain `f32` sequence. Every
//! encoder failure, including a panic, comes back as an `EmbeddingError`.

use crate::embeddings::{EmbeddingModelManager, ModelInfo, ModelType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};

/// Ordered sequence of floats produced by one encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// No encoder is loaded for the requested variant
    #[error("{model_type} model is not available")]
    ModelUnavailable { model_type: ModelType },

    /// The encoder ran but did not produce a valid vector.
    /// `reason` is for logs; it is kept out of the display message.
    #[error("{model_type} encoder failed to produce an embedding")]
    EncodingFailed { model_type: ModelType, reason: String },
}

/// Stateless request/response transformation over long-lived encoders
///
/// Constructed once at startup and shared through the router state.
#[derive(Debug, Clone)]
pub struct EmbeddingService {
    models: Arc<EmbeddingModelManager>,
}

impl EmbeddingService {
    pub fn new(models: Arc<EmbeddingModelManager>) -> Self {
        Self { models }
    }

    /// Encodes `sentence` with the encoder selected by `model_type`
    pub async fn embed(
        &self,
        sentence: &str,
        model_type: ModelType,
    ) -> Result<EmbeddingVector, EmbeddingError> {
        let span = info_span!("service.embedding", model_type = %model_type);
        async move {
            info!(chars = sentence.chars().count(), "Generating embedding");

            let encoder = self
                .models
                .encoder(model_type)
                .ok_or(EmbeddingError::ModelUnavailable { model_type })?;
            let dimension = encoder.dimension();
            let model = self.models.model_name(model_type).unwrap_or_default();
            let sentence = sentence.to_owned();
            let started = Instant::now();

            let vector = match tokio::task::spawn_blocking(move || encoder.encode(&sentence)).await
            {
                Ok(Ok(vector)) => vector,
                Ok(Err(e)) => {
                    let reason = format!("{:#}", e);
                    error!(%reason, "Encoder returned an error");
                    return Err(EmbeddingError::EncodingFailed { model_type, reason });
                }
                Err(e) => {
                    let reason = if e.is_panic() {
                        "encoder panicked".to_string()
                    } else {
                        format!("encoding task did not complete: {}", e)
                    };
                    error!(%reason, "Encoding task failed");
                    return Err(EmbeddingError::EncodingFailed { model_type, reason });
                }
            };

            if vector.is_empty() || vector.len() != dimension {
                let reason = format!(
                    "encoder returned {} values, expected {}",
                    vector.len(),
                    dimension
                );
                error!(%reason, "Encoder output rejected");
                return Err(EmbeddingError::EncodingFailed { model_type, reason });
            }

            debug!(
                model,
                dimension,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Embedding generated"
            );
            Ok::<_, EmbeddingError>(EmbeddingVector::from(vector))
        }
        .instrument(span)
        .await
    }

    /// Describes the generalist and specialist slots
    pub fn models(&self) -> Vec<ModelInfo> {
        self.models.list_models()
    }
}
