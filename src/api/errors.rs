// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::envelope::{ErrorKind, ResponseEnvelope};
use crate::service::EmbeddingError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Body could not be read or parsed
    InvalidRequest(String),
    /// Body parsed but violates the request schema
    ValidationError { field: String, message: String },
    /// Encoder ran and failed
    EncodingFailed(String),
    /// No encoder available for the request
    ServiceUnavailable(String),
    NotFound(String),
    MethodNotAllowed(String),
    /// Request exceeded the configured timeout
    Timeout,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ApiError::ValidationError { .. } => ErrorKind::ValidationError,
            ApiError::EncodingFailed(_) => ErrorKind::EncodingFailed,
            ApiError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            ApiError::Timeout => ErrorKind::Timeout,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::EncodingFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn to_envelope<T>(&self) -> ResponseEnvelope<T> {
        match self {
            ApiError::ValidationError { field, message } => {
                ResponseEnvelope::error(self.kind(), message.clone(), Some(field.clone()))
            }
            ApiError::InvalidRequest(msg)
            | ApiError::EncodingFailed(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg) => {
                ResponseEnvelope::error(self.kind(), msg.clone(), None)
            }
            ApiError::Timeout => ResponseEnvelope::error(self.kind(), self.to_string(), None),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::MethodNotAllowed(msg) => write!(f, "Method not allowed: {}", msg),
            ApiError::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<EmbeddingError> for ApiError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::ModelUnavailable { .. } => ApiError::ServiceUnavailable(err.to_string()),
            EmbeddingError::EncodingFailed { .. } => ApiError::EncodingFailed(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::ValidationError {
                field: "body".to_string(),
                message: e.body_text(),
            },
            other => ApiError::InvalidRequest(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope: ResponseEnvelope<()> = self.to_envelope();
        (self.status_code(), Json(envelope)).into_response()
    }
}
