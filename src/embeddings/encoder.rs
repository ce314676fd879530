// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects which pretrained encoder handles a request.
///
/// Dispatch sites match on it exhaustively.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// General-domain text
    #[default]
    Generalist,
    /// Biomedical / scientific text
    Specialist,
}

impl ModelType {
    pub const ALL: [ModelType; 2] = [ModelType::Generalist, ModelType::Specialist];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Generalist => "generalist",
            ModelType::Specialist => "specialist",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "generalist" => Ok(ModelType::Generalist),
            "specialist" => Ok(ModelType::Specialist),
            other => anyhow::bail!(
                "unknown model type '{}' (expected 'generalist' or 'specialist')",
                other
            ),
        }
    }
}

/// A pretrained model exposing a text-to-vector transformation.
///
/// `encode` is synchronous and CPU-bound; callers on an async runtime are
/// expected to move it onto a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait Encoder: Send + Sync {
    /// Fixed output dimensionality of this encoder
    fn dimension(&self) -> usize;

    /// Encodes one sentence into a vector of `dimension()` floats
    fn encode(&self, sentence: &str) -> Result<Vec<f32>>;
}
