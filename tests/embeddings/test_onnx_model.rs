// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! OnnxEmbeddingModel against real model files
//!
//! Set `EMBEDDING_TEST_MODEL_DIR` to a directory containing `model.onnx` and
//! `tokenizer.json` (defaults to `./models/generalist`).

use embedding_service::embeddings::{Encoder, OnnxEmbeddingModel, OnnxModelOptions};
use std::path::PathBuf;

fn model_dir() -> PathBuf {
    std::env::var_os("EMBEDDING_TEST_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./models/generalist"))
}

fn load(options: &OnnxModelOptions) -> OnnxEmbeddingModel {
    let dir = model_dir();
    OnnxEmbeddingModel::load(
        "test-model",
        dir.join("model.onnx"),
        dir.join("tokenizer.json"),
        options,
    )
    .expect("Failed to load model")
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm_a * norm_b)
}

#[test]
#[ignore] // Only run if model files are downloaded
fn test_embed_matches_reported_dimension() {
    let model = load(&OnnxModelOptions::default());

    let embedding = model.embed("Hello world").unwrap();

    assert_eq!(embedding.len(), model.dimension());
    assert!(embedding.iter().all(|v| v.is_finite()));
}

#[test]
#[ignore] // Only run if model files are downloaded
fn test_embed_is_deterministic() {
    let model = load(&OnnxModelOptions::default());

    let first = model.encode("The quick brown fox").unwrap();
    let second = model.encode("The quick brown fox").unwrap();

    assert_eq!(first, second);
}

#[test]
#[ignore] // Only run if model files are downloaded
fn test_similar_sentences_are_closer() {
    let model = load(&OnnxModelOptions::default());

    let cat = model.embed("A cat is sleeping on the sofa").unwrap();
    let kitten = model.embed("A kitten naps on the couch").unwrap();
    let finance = model.embed("Quarterly revenue exceeded forecasts").unwrap();

    assert!(cosine(&cat, &kitten) > cosine(&cat, &finance));
}

#[test]
#[ignore] // Only run if model files are downloaded
fn test_normalized_output_has_unit_length() {
    let model = load(&OnnxModelOptions {
        normalize: true,
        ..OnnxModelOptions::default()
    });

    let embedding = model.embed("normalize me").unwrap();
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    assert!((norm - 1.0).abs() < 1e-4);
}

#[test]
#[ignore] // Only run if model files are downloaded
fn test_long_input_is_truncated() {
    let model = load(&OnnxModelOptions {
        max_sequence_length: 32,
        ..OnnxModelOptions::default()
    });

    let long_text = "word ".repeat(2000);
    let embedding = model.embed(&long_text).unwrap();

    assert_eq!(embedding.len(), model.dimension());
}
