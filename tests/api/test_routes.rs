// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Root, health-check, models listing and fallback routes

use crate::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use embedding_service::embeddings::EmbeddingModelManager;

#[tokio::test]
async fn test_root_returns_welcome_message() {
    let app = test_app(EmbeddingModelManager::new());

    let (status, json) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Welcome to the Machine Learning API");
}

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = test_app(EmbeddingModelManager::new());

    let (status, json) = get(app, "/health-check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_models_lists_both_variants() {
    let (generalist, _) = counting_encoders();
    let app = test_app(manager_with(Some(generalist), None));

    let (status, json) = get(app, "/embedding/models").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let models = json["data"].as_array().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0]["type"], "generalist");
    assert_eq!(models[0]["name"], "test-generalist");
    assert_eq!(models[0]["dimensions"], GENERALIST_DIM);
    assert_eq!(models[0]["available"], true);
    assert_eq!(models[1]["type"], "specialist");
    assert_eq!(models[1]["available"], false);
}

#[tokio::test]
async fn test_unknown_route_returns_not_found_envelope() {
    let app = test_app(EmbeddingModelManager::new());

    let (status, json) = get(app, "/embedding/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["kind"], "not_found");
}

#[tokio::test]
async fn test_get_on_embedding_route_is_not_allowed() {
    let app = test_app(EmbeddingModelManager::new());

    let request = Request::builder()
        .uri("/embedding/general")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["kind"], "method_not_allowed");
    assert!(json["message"].as_str().unwrap().contains("GET"));
}

#[tokio::test]
async fn test_post_on_health_check_is_not_allowed() {
    let app = test_app(EmbeddingModelManager::new());

    let request = Request::builder()
        .method("POST")
        .uri("/health-check")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["error"]["kind"], "method_not_allowed");
}
