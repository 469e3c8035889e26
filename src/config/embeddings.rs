// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding backend configuration
//!
//! Backends are listed in a TOML file:
//!
//! ```toml
//! [[models]]
//! name = "bge-base"
//! kind = "onnx"
//! dimensions = 768
//! model_path = "./models/bge-base-zh-v1.5/model.onnx"
//! tokenizer_path = "./models/bge-base-zh-v1.5/tokenizer.json"
//! query_instruction = "为这个句子生成表示以用于检索相关文章："
//!
//! [[models]]
//! name = "hash-384"
//! kind = "hashing"
//! dimensions = 384
//! ```

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which engine implementation serves a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Sentence-transformer model executed with ONNX Runtime
    Onnx,
    /// Deterministic feature-hashing embedder, no model files needed
    Hashing,
}

/// Configuration for one named embedding backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingModelConfig {
    /// Backend name used in requests (e.g., "bge-base")
    pub name: String,
    pub kind: BackendKind,
    /// Expected embedding dimensions
    pub dimensions: usize,
    /// Whether vectors are scaled to unit length
    #[serde(default = "default_normalize")]
    pub normalize: bool,
    /// Prefix applied to texts embedded in query mode
    #[serde(default)]
    pub query_instruction: Option<String>,
    /// Path to ONNX model file (onnx only)
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Path to tokenizer JSON file (onnx only)
    #[serde(default)]
    pub tokenizer_path: Option<PathBuf>,
    /// Maximum tokens per text before truncation (onnx only)
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_normalize() -> bool {
    true
}

fn default_max_length() -> usize {
    512
}

impl EmbeddingModelConfig {
    /// Config for a hashing backend
    pub fn hashing(name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: name.into(),
            kind: BackendKind::Hashing,
            dimensions,
            normalize: default_normalize(),
            query_instruction: None,
            model_path: None,
            tokenizer_path: None,
            max_length: default_max_length(),
        }
    }

    /// Config for an ONNX backend
    pub fn onnx(
        name: impl Into<String>,
        model_path: impl Into<PathBuf>,
        tokenizer_path: impl Into<PathBuf>,
        dimensions: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind: BackendKind::Onnx,
            dimensions,
            normalize: default_normalize(),
            query_instruction: None,
            model_path: Some(model_path.into()),
            tokenizer_path: Some(tokenizer_path.into()),
            max_length: default_max_length(),
        }
    }

    pub fn with_query_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.query_instruction = Some(instruction.into());
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "models.name".to_string(),
                message: "model name cannot be empty".to_string(),
            });
        }
        if self.dimensions == 0 {
            return Err(ConfigError::Invalid {
                field: format!("models.{}.dimensions", self.name),
                message: "dimensions must be greater than 0".to_string(),
            });
        }
        if self.kind == BackendKind::Onnx {
            if self.model_path.is_none() {
                return Err(ConfigError::Invalid {
                    field: format!("models.{}.model_path", self.name),
                    message: "onnx backends require model_path".to_string(),
                });
            }
            if self.tokenizer_path.is_none() {
                return Err(ConfigError::Invalid {
                    field: format!("models.{}.tokenizer_path", self.name),
                    message: "onnx backends require tokenizer_path".to_string(),
                });
            }
            if self.max_length == 0 {
                return Err(ConfigError::Invalid {
                    field: format!("models.{}.max_length", self.name),
                    message: "max_length must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// All configured embedding backends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingModelsConfig {
    #[serde(default)]
    pub models: Vec<EmbeddingModelConfig>,
}

impl EmbeddingModelsConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validates every entry and rejects duplicate names
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for model in &self.models {
            model.validate()?;
            if !seen.insert(model.name.as_str()) {
                return Err(ConfigError::Invalid {
                    field: "models.name".to_string(),
                    message: format!("duplicate model name: {}", model.name),
                });
            }
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}
