// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbeddingRequest type for POST /embedding/general

use crate::api::ApiError;
use crate::embeddings::ModelType;
use serde::{Deserialize, Serialize};

/// Default upper bound on sentence length, in characters
pub const DEFAULT_MAX_SENTENCE_CHARS: usize = 8192;

/// Request body for POST /embedding/general
///
/// # Example
/// ```json
/// {
///   "sentence": "Aspirin reduces the risk of myocardial infarction",
///   "type": "specialist"
/// }
/// ```
///
/// `type` may be omitted and defaults to `generalist`, which keeps the
/// older `{"sentence": "..."}` body working. Unknown `type` values fail
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub sentence: String,

    #[serde(rename = "type", default)]
    pub model_type: ModelType,
}

impl EmbeddingRequest {
    /// Validates the request
    ///
    /// # Validation Rules
    /// 1. **sentence**: cannot be empty or whitespace-only
    /// 2. **sentence**: at most `max_chars` characters
    pub fn validate(&self, max_chars: usize) -> Result<(), ApiError> {
        if self.sentence.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "sentence".to_string(),
                message: "sentence cannot be empty or contain only whitespace".to_string(),
            });
        }

        let chars = self.sentence.chars().count();
        if chars > max_chars {
            return Err(ApiError::ValidationError {
                field: "sentence".to_string(),
                message: format!(
                    "sentence cannot exceed {} characters (got {} characters)",
                    max_chars, chars
                ),
            });
        }

        Ok(())
    }
}
