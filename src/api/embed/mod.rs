// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! POST /embedding/general: sentence + model type in, vector envelope out.

pub mod handler;
pub mod request;

pub use handler::general_embedding_handler;
pub use request::{EmbeddingRequest, DEFAULT_MAX_SENTENCE_CHARS};
