// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod service;
pub mod version;

// Re-export main types
pub use api::{create_app, start_server, ApiError, AppState, HttpSettings};
pub use config::ServerConfig;
pub use embeddings::{EmbeddingModelManager, Encoder, ModelType};
pub use service::{EmbeddingError, EmbeddingService, EmbeddingVector};
