// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use embed::{general_embedding_handler, EmbeddingRequest};
pub use envelope::{ErrorKind, ResponseEnvelope};
pub use errors::ApiError;
pub use handlers::{HealthResponse, RootResponse};
pub use http_server::{create_app, start_server, AppState, HttpSettings};
