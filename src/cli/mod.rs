// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::embed::{EmbeddingRequest, DEFAULT_MAX_SENTENCE_CHARS};
use crate::config::ModelArgs;
use crate::embeddings::{download_model_files, EmbeddingModelManager, ModelType};
use crate::service::EmbeddingService;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

/// Embedding Service CLI
#[derive(Parser, Debug)]
#[command(name = "embedding-cli")]
#[command(version)]
#[command(about = "CLI tools for embedding model management", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub models: ModelArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download model files into the models directory
    Download {
        /// Only download this variant (default: both)
        #[arg(long = "type", value_enum)]
        model_type: Option<ModelType>,
    },

    /// Encode one sentence and print the vector as JSON
    Embed {
        #[arg(long = "type", value_enum, default_value_t = ModelType::Generalist)]
        model_type: ModelType,

        sentence: String,
    },
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Download { model_type } => download(&cli.models, model_type).await,
        Commands::Embed {
            model_type,
            sentence,
        } => embed(&cli.models, model_type, &sentence).await,
    }
}

async fn download(models: &ModelArgs, only: Option<ModelType>) -> Result<()> {
    let selected: Vec<ModelType> = match only {
        Some(model_type) => vec![model_type],
        None => ModelType::ALL.to_vec(),
    };

    for model_type in selected {
        let spec = models.spec_for(model_type);
        let models_dir = models.models_dir.clone();
        println!("Downloading {} model {}...", model_type, spec.repo_id);

        let files = tokio::task::spawn_blocking(move || download_model_files(&models_dir, &spec))
            .await
            .context("Download task failed")??;

        println!("  model:     {}", files.model_path.display());
        println!("  tokenizer: {}", files.tokenizer_path.display());
    }

    Ok(())
}

async fn embed(models: &ModelArgs, model_type: ModelType, sentence: &str) -> Result<()> {
    let request = EmbeddingRequest {
        sentence: sentence.to_string(),
        model_type,
    };
    request.validate(DEFAULT_MAX_SENTENCE_CHARS)?;

    let manager = EmbeddingModelManager::load_onnx(
        vec![models.spec_for(model_type)],
        models.models_dir.clone(),
        models.download_models,
        models.onnx_options(),
    )
    .await?;

    let service = EmbeddingService::new(Arc::new(manager));
    let vector = service.embed(&request.sentence, request.model_type).await?;

    println!("{}", serde_json::to_string(&vector)?);
    Ok(())
}
