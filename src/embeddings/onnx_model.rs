// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs a sentence-transformer exported to ONNX (e.g. jina-embeddings-v2,
//! PubMedBERT) through ONNX Runtime.
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA when built with the `cuda` feature (CPU fallback)
//! - Tokenization with truncation at the configured sequence length
//! - Graphs with or without a `token_type_ids` input
//! - Output dimension discovered with a probe inference at load time
//! - Attention-masked mean pooling over token embeddings
//! - Optional L2 normalization

use crate::embeddings::Encoder;
use anyhow::{Context, Result};
use ndarray::{Array2, ArrayView2, Axis, Ix2};
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Encoding, Tokenizer, TruncationParams};
use tracing::{debug, info};
#[cfg(feature = "cuda")]
use tracing::warn;

/// Loading options for an ONNX sentence encoder
#[derive(Debug, Clone)]
pub struct OnnxModelOptions {
    /// Tokens beyond this length are truncated
    pub max_sequence_length: usize,
    /// L2-normalize pooled vectors
    pub normalize: bool,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
    /// Reject the model if its output dimension differs
    pub expected_dimension: Option<usize>,
}

impl Default for OnnxModelOptions {
    fn default() -> Self {
        Self {
            max_sequence_length: 512,
            normalize: false,
            intra_threads: 4,
            expected_dimension: None,
        }
    }
}

/// ONNX-based sentence embedding model
///
/// # Thread Safety
/// The session sits behind a `Mutex` because `Session::run` needs exclusive
/// access; concurrent `encode` calls on the same model are serialized.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
    uses_token_type_ids: bool,
    normalize: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("uses_token_type_ids", &self.uses_token_type_ids)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads an ONNX model and its tokenizer from disk
    ///
    /// Blocking: builds the ONNX Runtime session and runs one probe
    /// inference. Call from a blocking thread when on an async runtime.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The probe output has an unsupported shape
    /// - The output dimension differs from `options.expected_dimension`
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::load(
    ///     "jinaai/jina-embeddings-v2-base-en",
    ///     "./models/generalist/model.onnx",
    ///     "./models/generalist/tokenizer.json",
    ///     &OnnxModelOptions::default(),
    /// )?;
    /// ```
    pub fn load<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        options: &OnnxModelOptions,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let mut session = build_session(model_path, options.intra_threads)?;
        let uses_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: options.max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        // Probe inference: discovers the pooled output dimension
        let probe = tokenizer
            .encode("validation test", true)
            .map_err(|e| anyhow::anyhow!("Tokenizer validation failed: {}", e))?;
        let dimension = infer(&mut session, uses_token_type_ids, &probe)
            .context("Probe inference failed")?
            .len();

        if dimension == 0 {
            anyhow::bail!("Model {} produced an empty embedding", model_name);
        }
        if let Some(expected) = options.expected_dimension {
            if expected != dimension {
                anyhow::bail!(
                    "Model {} dimension mismatch: expected {}, got {}",
                    model_name,
                    expected,
                    dimension
                );
            }
        }

        info!(
            model = %model_name,
            dimension,
            uses_token_type_ids,
            "ONNX embedding model loaded"
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
            uses_token_type_ids,
            normalize: options.normalize,
        })
    }

    /// Generates the embedding for a single sentence
    ///
    /// 1. Tokenize (truncated to the configured sequence length)
    /// 2. Run ONNX inference
    /// 3. Mean pooling weighted by the attention mask
    /// 4. Optional L2 normalization
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;
        debug!(model = %self.model_name, tokens = encoding.len(), "encoding sentence");

        let mut pooled = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;
            infer(&mut session, self.uses_token_type_ids, &encoding)?
        };

        if pooled.len() != self.dimension {
            anyhow::bail!(
                "Unexpected embedding dimension: {} (expected {})",
                pooled.len(),
                self.dimension
            );
        }

        if self.normalize {
            l2_normalize(&mut pooled);
        }

        Ok(pooled)
    }

    /// Returns the output dimension of this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Encoder for OnnxEmbeddingModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, sentence: &str) -> Result<Vec<f32>> {
        self.embed(sentence)
    }
}

fn build_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    #[cfg(feature = "cuda")]
    {
        info!("Attempting CUDA execution provider");
        let cuda = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path);

        match cuda {
            Ok(session) => return Ok(session),
            Err(e) => warn!("CUDA execution provider failed, falling back to CPU: {}", e),
        }
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context(format!(
            "Failed to load ONNX model from {}",
            model_path.display()
        ))
}

/// Runs one sentence through the session and pools the output
fn infer(session: &mut Session, uses_token_type_ids: bool, encoding: &Encoding) -> Result<Vec<f32>> {
    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let seq_len = input_ids.len();

    let input_ids_array = Array2::from_shape_vec((1, seq_len), input_ids)
        .context("Failed to create input_ids array")?;
    let attention_mask_array = Array2::from_shape_vec((1, seq_len), attention_mask.clone())
        .context("Failed to create attention_mask array")?;

    let outputs = if uses_token_type_ids {
        let token_type_ids_array = Array2::<i64>::zeros((1, seq_len));
        session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids_array)?,
            "attention_mask" => Value::from_array(attention_mask_array)?,
            "token_type_ids" => Value::from_array(token_type_ids_array)?
        ])?
    } else {
        session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids_array)?,
            "attention_mask" => Value::from_array(attention_mask_array)?
        ])?
    };

    // Index [0]: output names differ between exports
    let output = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;

    match output.ndim() {
        // [batch, seq_len, hidden]: token embeddings
        3 => {
            let tokens = output
                .index_axis(Axis(0), 0)
                .into_dimensionality::<Ix2>()
                .context("Unexpected token embedding shape")?;
            Ok(mean_pool(tokens, &attention_mask))
        }
        // [batch, hidden]: already pooled
        2 => Ok(output.index_axis(Axis(0), 0).iter().copied().collect()),
        _ => anyhow::bail!(
            "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, hidden] or [batch, hidden])",
            output.shape()
        ),
    }
}

/// Mean over token rows, weighted by the attention mask
pub(crate) fn mean_pool(tokens: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let mut pooled = vec![0.0f32; tokens.ncols()];
    let mut sum_mask = 0.0f32;

    for (row, &mask) in tokens.rows().into_iter().zip(attention_mask) {
        let weight = mask as f32;
        sum_mask += weight;
        for (acc, value) in pooled.iter_mut().zip(row.iter()) {
            *acc += value * weight;
        }
    }

    for value in &mut pooled {
        *value /= sum_mask.max(1e-9);
    }
    pooled
}

pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
