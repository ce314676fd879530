// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Runtime configuration
//!
//! Every setting is a CLI flag with an environment-variable fallback. `.env`
//! is loaded before parsing, so the same variables work from a file.

pub mod logging;

use crate::api::HttpSettings;
use crate::embeddings::{EncoderSpec, ModelType, OnnxModelOptions};
use anyhow::{Context, Result};
use clap::{Args, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub use logging::init_tracing;

/// Model loading settings shared by the server and the CLI
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Directory holding `<variant>/model.onnx` and `<variant>/tokenizer.json`
    #[arg(long, env = "MODELS_DIR", default_value = "./models")]
    pub models_dir: PathBuf,

    /// Hugging Face repository of the generalist model
    #[arg(long, env = "GENERALIST_MODEL", default_value = "jinaai/jina-embeddings-v2-base-en")]
    pub generalist_model: String,

    /// ONNX file inside the generalist repository
    #[arg(long, env = "GENERALIST_ONNX_FILE", default_value = "onnx/model.onnx")]
    pub generalist_onnx_file: String,

    /// Hugging Face repository of the specialist model
    #[arg(long, env = "SPECIALIST_MODEL", default_value = "NeuML/pubmedbert-base-embeddings")]
    pub specialist_model: String,

    /// ONNX file inside the specialist repository
    #[arg(long, env = "SPECIALIST_ONNX_FILE", default_value = "onnx/model.onnx")]
    pub specialist_onnx_file: String,

    /// Fetch missing model files from the Hugging Face Hub
    #[arg(long, env = "DOWNLOAD_MODELS")]
    pub download_models: bool,

    /// Tokens beyond this length are truncated
    #[arg(long, env = "MAX_SEQUENCE_LENGTH", default_value_t = 512)]
    pub max_sequence_length: usize,

    /// L2-normalize embeddings
    #[arg(long, env = "NORMALIZE_EMBEDDINGS")]
    pub normalize_embeddings: bool,

    /// ONNX Runtime intra-op threads per model
    #[arg(long, env = "ONNX_INTRA_THREADS", default_value_t = 4)]
    pub onnx_intra_threads: usize,
}

impl ModelArgs {
    pub fn spec_for(&self, model_type: ModelType) -> EncoderSpec {
        let (repo_id, onnx_file) = match model_type {
            ModelType::Generalist => (&self.generalist_model, &self.generalist_onnx_file),
            ModelType::Specialist => (&self.specialist_model, &self.specialist_onnx_file),
        };
        EncoderSpec {
            model_type,
            repo_id: repo_id.clone(),
            onnx_file: onnx_file.clone(),
        }
    }

    pub fn encoder_specs(&self) -> Vec<EncoderSpec> {
        ModelType::ALL.iter().map(|&t| self.spec_for(t)).collect()
    }

    pub fn onnx_options(&self) -> OnnxModelOptions {
        OnnxModelOptions {
            max_sequence_length: self.max_sequence_length,
            normalize: self.normalize_embeddings,
            intra_threads: self.onnx_intra_threads,
            expected_dimension: None,
        }
    }
}

/// Embedding API server configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "embedding-service")]
#[command(version, about = "HTTP service for sentence embeddings", long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "APP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "APP_PORT", default_value_t = 8000)]
    pub port: u16,

    #[command(flatten)]
    pub models: ModelArgs,

    /// Longest accepted sentence, in characters
    #[arg(long, env = "MAX_SENTENCE_CHARS", default_value_t = 8192)]
    pub max_sentence_chars: usize,

    /// Per-request timeout
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 180)]
    pub request_timeout_secs: u64,

    /// Largest accepted request body
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            max_sentence_chars: self.max_sentence_chars,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_body_bytes: self.max_body_bytes,
        }
    }
}
