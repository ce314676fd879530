// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embedding models
//!
//! - `encoder`: the `Encoder` trait and the `ModelType` selector
//! - `onnx_model`: ONNX Runtime sentence-transformer encoder
//! - `model_manager`: one long-lived encoder per model variant
//! - `download`: model file resolution (local directory or Hugging Face Hub)

pub mod download;
pub mod encoder;
pub mod model_manager;
pub mod onnx_model;

pub use download::{download_model_files, resolve_model_files, ModelFiles};
pub use encoder::{Encoder, ModelType};
pub use model_manager::{EmbeddingModelManager, EncoderSpec, ModelInfo};
pub use onnx_model::{OnnxEmbeddingModel, OnnxModelOptions};

#[cfg(test)]
pub use encoder::MockEncoder;
