// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbeddingModelManager loading from a models directory

use embedding_service::embeddings::{
    EmbeddingModelManager, EncoderSpec, ModelType, OnnxModelOptions,
};
use std::fs;
use tempfile::TempDir;

fn default_specs() -> Vec<EncoderSpec> {
    ModelType::ALL.map(EncoderSpec::default_for).to_vec()
}

#[tokio::test]
async fn test_load_onnx_fails_on_empty_models_dir() {
    let dir = TempDir::new().unwrap();

    let result = EmbeddingModelManager::load_onnx(
        default_specs(),
        dir.path().to_path_buf(),
        false,
        OnnxModelOptions::default(),
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("No models loaded"));
}

#[tokio::test]
async fn test_load_onnx_rejects_invalid_model_files() {
    let dir = TempDir::new().unwrap();
    for model_type in ModelType::ALL {
        let variant_dir = dir.path().join(model_type.as_str());
        fs::create_dir_all(&variant_dir).unwrap();
        fs::write(variant_dir.join("model.onnx"), b"not an onnx graph").unwrap();
        fs::write(variant_dir.join("tokenizer.json"), b"{}").unwrap();
    }

    let result = EmbeddingModelManager::load_onnx(
        default_specs(),
        dir.path().to_path_buf(),
        false,
        OnnxModelOptions::default(),
    )
    .await;

    assert!(result.is_err());
}

/// Needs the generalist files under `./models/generalist`
#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_load_onnx_with_only_generalist_present() {
    let specs = vec![
        EncoderSpec::default_for(ModelType::Generalist),
        EncoderSpec {
            model_type: ModelType::Specialist,
            repo_id: "missing/specialist".to_string(),
            onnx_file: "onnx/model.onnx".to_string(),
        },
    ];

    let manager = EmbeddingModelManager::load_onnx(
        specs,
        "./models".into(),
        false,
        OnnxModelOptions::default(),
    )
    .await
    .expect("generalist should load");

    assert_eq!(manager.loaded_count(), 1);
    let models = manager.list_models();
    assert!(models[0].available);
    assert!(models[0].dimensions > 0);
    assert!(!models[1].available);
    assert_eq!(models[1].name, "missing/specialist");
}
