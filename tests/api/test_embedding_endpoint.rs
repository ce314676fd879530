// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embedding/general success paths
//!
//! Encoders are in-process counting stubs, so routing can be checked by
//! invocation counts and by the marker in the first vector component.

use crate::common::*;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_generalist_request_uses_generalist_encoder() {
    let (generalist, specialist) = counting_encoders();
    let app = test_app(manager_with(
        Some(generalist.clone()),
        Some(specialist.clone()),
    ));

    let body = json!({"sentence": "The cat sat on the mat", "type": "generalist"});
    let (status, json) = post_embedding(app, body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Successfully generated embedding");

    let vector = vector_of(&json);
    assert_eq!(vector.len(), GENERALIST_DIM);
    assert_eq!(vector[0], generalist.marker());
    assert_eq!(generalist.calls(), 1);
    assert_eq!(specialist.calls(), 0);
}

#[tokio::test]
async fn test_specialist_request_uses_specialist_encoder() {
    let (generalist, specialist) = counting_encoders();
    let app = test_app(manager_with(
        Some(generalist.clone()),
        Some(specialist.clone()),
    ));

    let body = json!({"sentence": "Aspirin inhibits COX-1", "type": "specialist"});
    let (status, json) = post_embedding(app, body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let vector = vector_of(&json);
    assert_eq!(vector.len(), SPECIALIST_DIM);
    assert_eq!(vector[0], specialist.marker());
    assert_eq!(generalist.calls(), 0);
    assert_eq!(specialist.calls(), 1);
}

#[tokio::test]
async fn test_missing_type_defaults_to_generalist() {
    let (generalist, specialist) = counting_encoders();
    let app = test_app(manager_with(
        Some(generalist.clone()),
        Some(specialist.clone()),
    ));

    let (status, json) = post_embedding(app, r#"{"sentence": "hello"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(vector_of(&json)[0], generalist.marker());
    assert_eq!(specialist.calls(), 0);
}

#[tokio::test]
async fn test_same_input_gives_identical_vectors() {
    let (generalist, specialist) = counting_encoders();
    let app = test_app(manager_with(Some(generalist.clone()), Some(specialist)));
    let body = json!({"sentence": "deterministic output", "type": "generalist"}).to_string();

    let (_, first) = post_embedding(app.clone(), body.clone()).await;
    let (_, second) = post_embedding(app, body).await;

    assert_eq!(vector_of(&first), vector_of(&second));
    assert_eq!(generalist.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_interleaved_requests_are_routed_correctly() {
    let (generalist, specialist) = counting_encoders();
    let app = test_app(manager_with(
        Some(generalist.clone()),
        Some(specialist.clone()),
    ));

    let requests = (0..20).map(|i| {
        let app = app.clone();
        let model_type = if i % 2 == 0 { "generalist" } else { "specialist" };
        async move {
            let body = json!({"sentence": format!("sentence {}", i), "type": model_type});
            let (status, json) = post_embedding(app, body.to_string()).await;
            (model_type, status, vector_of(&json))
        }
    });

    let results = futures_util::future::join_all(requests).await;

    for (model_type, status, vector) in results {
        assert_eq!(status, StatusCode::OK);
        match model_type {
            "generalist" => {
                assert_eq!(vector.len(), GENERALIST_DIM);
                assert_eq!(vector[0], generalist.marker());
            }
            _ => {
                assert_eq!(vector.len(), SPECIALIST_DIM);
                assert_eq!(vector[0], specialist.marker());
            }
        }
    }
    assert_eq!(generalist.calls(), 10);
    assert_eq!(specialist.calls(), 10);
}

#[tokio::test]
async fn test_unicode_sentence_is_accepted() {
    let (generalist, specialist) = counting_encoders();
    let app = test_app(manager_with(Some(generalist.clone()), Some(specialist)));

    let body = json!({"sentence": "Le patient présente une fièvre 🤒", "type": "generalist"});
    let (status, json) = post_embedding(app, body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!vector_of(&json).is_empty());
}
