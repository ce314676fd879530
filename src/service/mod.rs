// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embedding;

pub use embedding::{EmbeddingError, EmbeddingService, EmbeddingVector};
