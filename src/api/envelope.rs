// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Uniform response envelope
//!
//! Every API response body is one of:
//! ```json
//! {"success": true, "message": "...", "data": [0.1, 0.2]}
//! {"success": false, "message": "...", "error": {"kind": "validation_error", "field": "sentence"}}
//! ```

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    ValidationError,
    EncodingFailed,
    ServiceUnavailable,
    NotFound,
    MethodNotAllowed,
    Timeout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope<T> {
    Success {
        message: String,
        data: T,
    },
    Error {
        kind: ErrorKind,
        message: String,
        field: Option<String>,
    },
}

impl<T> ResponseEnvelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ResponseEnvelope::Success {
            message: message.into(),
            data,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>, field: Option<String>) -> Self {
        ResponseEnvelope::Error {
            kind,
            message: message.into(),
            field,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success { .. })
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl<T: Serialize> Serialize for ResponseEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResponseEnvelope", 3)?;
        match self {
            ResponseEnvelope::Success { message, data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("message", message)?;
                state.serialize_field("data", data)?;
            }
            ResponseEnvelope::Error {
                kind,
                message,
                field,
            } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
                state.serialize_field(
                    "error",
                    &ErrorBody {
                        kind: *kind,
                        field: field.as_deref(),
                    },
                )?;
            }
        }
        state.end()
    }
}
