// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the embedding service

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-16";

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-dual-encoder-2026-10-16";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "generalist-encoder",
    "specialist-encoder",
    "onnx-runtime",
    "hf-hub-download",
    "response-envelope",
    #[cfg(feature = "cuda")]
    "cuda",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Embedding Service {} ({})", VERSION_NUMBER, BUILD_DATE)
}
