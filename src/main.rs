// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use embedding_service::{
    api::{start_server, AppState},
    config::{init_tracing, ServerConfig},
    embeddings::EmbeddingModelManager,
    service::EmbeddingService,
    version,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = ServerConfig::parse();
    init_tracing(config.log_json);

    info!("Starting {}", version::get_version_string());
    info!("Build: {}", version::VERSION);

    let addr = config.socket_addr()?;

    info!("Loading embedding models from {}", config.models.models_dir.display());
    let manager = EmbeddingModelManager::load_onnx(
        config.models.encoder_specs(),
        config.models.models_dir.clone(),
        config.models.download_models,
        config.models.onnx_options(),
    )
    .await
    .context("Failed to load embedding models")?;

    for model in manager.list_models() {
        if model.available {
            info!(
                "  {} -> {} ({} dimensions)",
                model.model_type, model.name, model.dimensions
            );
        } else {
            warn!("  {} -> {} unavailable", model.model_type, model.name);
        }
    }

    let service = EmbeddingService::new(Arc::new(manager));
    let state = AppState::new(service, config.http_settings());

    start_server(addr, state).await
}
