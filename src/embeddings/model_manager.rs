// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Model Manager
//!
//! Owns one long-lived encoder per `ModelType`. Variants are loaded in
//! parallel at startup; a variant that fails to load leaves its slot
//! unavailable instead of aborting the process.

use crate::embeddings::{
    resolve_model_files, Encoder, ModelType, OnnxEmbeddingModel, OnnxModelOptions,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Where to find the pretrained weights for one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSpec {
    pub model_type: ModelType,
    /// Hugging Face repository id (e.g. "jinaai/jina-embeddings-v2-base-en")
    pub repo_id: String,
    /// Path of the ONNX export inside the repository
    pub onnx_file: String,
}

impl EncoderSpec {
    /// Built-in model choice for each variant
    pub fn default_for(model_type: ModelType) -> Self {
        let repo_id = match model_type {
            ModelType::Generalist => "jinaai/jina-embeddings-v2-base-en",
            ModelType::Specialist => "NeuML/pubmedbert-base-embeddings",
        };
        Self {
            model_type,
            repo_id: repo_id.to_string(),
            onnx_file: "onnx/model.onnx".to_string(),
        }
    }
}

/// Information about one model slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(rename = "type")]
    pub model_type: ModelType,
    pub name: String,
    pub dimensions: usize,
    /// Whether the encoder is loaded and serving
    pub available: bool,
}

#[derive(Clone, Default)]
enum Slot {
    #[default]
    Empty,
    Loaded {
        name: String,
        encoder: Arc<dyn Encoder>,
    },
    Failed {
        name: String,
    },
}

/// Manager for the generalist and specialist encoders
///
/// Encoders are shared read-only behind `Arc`; cloning the manager is cheap.
///
/// # Example
/// ```ignore
/// let specs = ModelType::ALL.map(EncoderSpec::default_for).to_vec();
/// let manager = EmbeddingModelManager::load_onnx(specs, "./models".into(), false, OnnxModelOptions::default()).await?;
/// let encoder = manager.encoder(ModelType::Generalist).expect("loaded");
/// ```
#[derive(Clone, Default)]
pub struct EmbeddingModelManager {
    generalist: Slot,
    specialist: Slot,
}

impl std::fmt::Debug for EmbeddingModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingModelManager")
            .field("models", &self.list_models())
            .finish()
    }
}

impl EmbeddingModelManager {
    /// Creates a manager with no encoders
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an already-constructed encoder for a variant (builder pattern)
    pub fn with_encoder(
        mut self,
        model_type: ModelType,
        name: impl Into<String>,
        encoder: Arc<dyn Encoder>,
    ) -> Self {
        *self.slot_mut(model_type) = Slot::Loaded {
            name: name.into(),
            encoder,
        };
        self
    }

    /// Loads every spec in parallel using `loader`
    ///
    /// # Behavior
    /// - One blocking task per spec (model loading is CPU/IO heavy)
    /// - A failed variant is logged and marked unavailable
    /// - Returns error only if NO variant loads
    pub async fn load<F>(specs: Vec<EncoderSpec>, loader: F) -> Result<Self>
    where
        F: Fn(&EncoderSpec) -> Result<Arc<dyn Encoder>> + Send + Sync + 'static,
    {
        if specs.is_empty() {
            anyhow::bail!("No model configurations provided");
        }

        info!("Loading {} embedding models in parallel", specs.len());

        let loader = Arc::new(loader);
        let mut load_tasks = Vec::with_capacity(specs.len());
        for spec in specs {
            let loader = Arc::clone(&loader);
            let task = tokio::task::spawn_blocking(move || {
                info!(model_type = %spec.model_type, repo = %spec.repo_id, "Loading embedding model");
                let result = loader(&spec);
                (spec, result)
            });
            load_tasks.push(task);
        }

        let mut manager = Self::new();
        for task in load_tasks {
            let (spec, result) = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Model loading task failed: {}", e);
                    continue;
                }
            };

            if !matches!(manager.slot(spec.model_type), Slot::Empty) {
                warn!(model_type = %spec.model_type, "Duplicate model spec, replacing earlier one");
            }

            match result {
                Ok(encoder) => {
                    info!(
                        model_type = %spec.model_type,
                        repo = %spec.repo_id,
                        dimension = encoder.dimension(),
                        "Loaded embedding model"
                    );
                    *manager.slot_mut(spec.model_type) = Slot::Loaded {
                        name: spec.repo_id,
                        encoder,
                    };
                }
                Err(e) => {
                    error!(
                        model_type = %spec.model_type,
                        repo = %spec.repo_id,
                        "Failed to load embedding model: {:#}",
                        e
                    );
                    *manager.slot_mut(spec.model_type) = Slot::Failed { name: spec.repo_id };
                }
            }
        }

        if manager.loaded_count() == 0 {
            anyhow::bail!("No models loaded successfully");
        }

        info!(
            "Embedding model manager initialized: {} of {} models loaded",
            manager.loaded_count(),
            ModelType::ALL.len()
        );

        Ok(manager)
    }

    /// Loads ONNX encoders, resolving (and optionally downloading) their files
    pub async fn load_onnx(
        specs: Vec<EncoderSpec>,
        models_dir: PathBuf,
        allow_download: bool,
        options: OnnxModelOptions,
    ) -> Result<Self> {
        Self::load(specs, move |spec| {
            let files = resolve_model_files(&models_dir, spec, allow_download)?;
            let model = OnnxEmbeddingModel::load(
                spec.repo_id.clone(),
                files.model_path,
                files.tokenizer_path,
                &options,
            )?;
            Ok(Arc::new(model) as Arc<dyn Encoder>)
        })
        .await
    }

    /// Returns the encoder for a variant, if it is loaded
    pub fn encoder(&self, model_type: ModelType) -> Option<Arc<dyn Encoder>> {
        match self.slot(model_type) {
            Slot::Loaded { encoder, .. } => Some(Arc::clone(encoder)),
            Slot::Empty | Slot::Failed { .. } => None,
        }
    }

    /// Returns the configured model name for a variant
    pub fn model_name(&self, model_type: ModelType) -> Option<&str> {
        match self.slot(model_type) {
            Slot::Loaded { name, .. } | Slot::Failed { name } => Some(name),
            Slot::Empty => None,
        }
    }

    /// Describes every variant, in `ModelType::ALL` order
    pub fn list_models(&self) -> Vec<ModelInfo> {
        ModelType::ALL
            .iter()
            .map(|&model_type| match self.slot(model_type) {
                Slot::Loaded { name, encoder } => ModelInfo {
                    model_type,
                    name: name.clone(),
                    dimensions: encoder.dimension(),
                    available: true,
                },
                Slot::Failed { name } => ModelInfo {
                    model_type,
                    name: name.clone(),
                    dimensions: 0,
                    available: false,
                },
                Slot::Empty => ModelInfo {
                    model_type,
                    name: String::new(),
                    dimensions: 0,
                    available: false,
                },
            })
            .collect()
    }

    /// Returns the number of loaded encoders
    pub fn loaded_count(&self) -> usize {
        ModelType::ALL
            .iter()
            .filter(|&&model_type| matches!(self.slot(model_type), Slot::Loaded { .. }))
            .count()
    }

    fn slot(&self, model_type: ModelType) -> &Slot {
        match model_type {
            ModelType::Generalist => &self.generalist,
            ModelType::Specialist => &self.specialist,
        }
    }

    fn slot_mut(&mut self, model_type: ModelType) -> &mut Slot {
        match model_type {
            ModelType::Generalist => &mut self.generalist,
            ModelType::Specialist => &mut self.specialist,
        }
    }
}
