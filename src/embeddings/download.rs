// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution
//!
//! Each variant lives in `<models_dir>/<variant>/{model.onnx,tokenizer.json}`.
//! When those files are missing and downloads are allowed, the ONNX export
//! and tokenizer are fetched from the variant's Hugging Face repository
//! (cached under `<models_dir>/.hf-cache`) and copied into that layout.
//! A `.source` file next to them records which `repo_id:onnx_file` they came
//! from; files from a different source are not served.

use crate::embeddings::{EncoderSpec, ModelType};
use anyhow::{Context, Result};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";
const HUB_CACHE_DIR: &str = ".hf-cache";
const SOURCE_FILE: &str = ".source";

/// On-disk location of one encoder's files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

impl ModelFiles {
    /// Expected local layout for a variant
    pub fn local(models_dir: &Path, model_type: ModelType) -> Self {
        let dir = models_dir.join(model_type.as_str());
        Self {
            model_path: dir.join(MODEL_FILE),
            tokenizer_path: dir.join(TOKENIZER_FILE),
        }
    }

    pub fn exist(&self) -> bool {
        self.model_path.is_file() && self.tokenizer_path.is_file()
    }

    fn source_path(&self) -> PathBuf {
        self.model_path.with_file_name(SOURCE_FILE)
    }

    /// Recorded `repo_id:onnx_file`, if the files were installed by a download
    fn recorded_source(&self) -> Option<String> {
        fs::read_to_string(self.source_path())
            .ok()
            .map(|s| s.trim().to_string())
    }
}

fn source_id(spec: &EncoderSpec) -> String {
    format!("{}:{}", spec.repo_id, spec.onnx_file)
}

/// Finds the files for `spec`, downloading them if allowed and absent
///
/// Blocking when a download happens.
pub fn resolve_model_files(
    models_dir: &Path,
    spec: &EncoderSpec,
    allow_download: bool,
) -> Result<ModelFiles> {
    let local = ModelFiles::local(models_dir, spec.model_type);
    if local.exist() {
        match local.recorded_source() {
            Some(source) if source == source_id(spec) => return Ok(local),
            Some(source) if !allow_download => anyhow::bail!(
                "Model files for {} at {} come from {}, but {} is configured (remove them or enable DOWNLOAD_MODELS)",
                spec.model_type,
                local.model_path.display(),
                source,
                source_id(spec)
            ),
            Some(source) => {
                warn!(
                    model_type = %spec.model_type,
                    installed = %source,
                    configured = %source_id(spec),
                    "Installed model does not match configuration, downloading"
                );
            }
            None => {
                info!(
                    model_type = %spec.model_type,
                    path = %local.model_path.display(),
                    "Using model files without a recorded source"
                );
                return Ok(local);
            }
        }
    } else if !allow_download {
        anyhow::bail!(
            "Model files for {} not found at {} (enable DOWNLOAD_MODELS to fetch {} from Hugging Face Hub)",
            spec.model_type,
            local.model_path.display(),
            spec.repo_id
        );
    }

    download_model_files(models_dir, spec)
}

/// Fetches `spec.onnx_file` and `tokenizer.json` from the Hugging Face Hub
/// and installs them into the variant's local directory
pub fn download_model_files(models_dir: &Path, spec: &EncoderSpec) -> Result<ModelFiles> {
    info!(
        model_type = %spec.model_type,
        repo = %spec.repo_id,
        file = %spec.onnx_file,
        "Downloading embedding model from Hugging Face Hub"
    );

    let api = ApiBuilder::new()
        .with_cache_dir(models_dir.join(HUB_CACHE_DIR))
        .with_progress(false)
        .build()
        .context("Failed to initialize Hugging Face Hub client")?;
    let repo = api.repo(Repo::new(spec.repo_id.clone(), RepoType::Model));

    let cached_model = repo
        .get(&spec.onnx_file)
        .with_context(|| format!("Failed to download {} from {}", spec.onnx_file, spec.repo_id))?;
    let cached_tokenizer = repo
        .get(TOKENIZER_FILE)
        .with_context(|| format!("Failed to download {} from {}", TOKENIZER_FILE, spec.repo_id))?;

    let local = ModelFiles::local(models_dir, spec.model_type);
    install(&cached_model, &local.model_path)?;
    install(&cached_tokenizer, &local.tokenizer_path)?;
    fs::write(local.source_path(), source_id(spec))
        .with_context(|| format!("Failed to write {}", local.source_path().display()))?;

    info!(
        model_type = %spec.model_type,
        path = %local.model_path.display(),
        "Model download complete"
    );

    Ok(local)
}

fn install(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(from, to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}
