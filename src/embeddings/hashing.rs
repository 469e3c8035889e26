// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Feature-hashing embedding engine
//!
//! Produces deterministic vectors without model files: each word token (or
//! CJK character) is hashed into one of `dimensions` buckets with a signed
//! weight. Texts sharing tokens land close together, which is enough for
//! smoke tests and for deployments without a GPU.

use super::engine::{apply_query_instruction, l2_normalize, EmbedMode, EmbeddingEngine};
use crate::config::EmbeddingModelConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    model_name: String,
    dimension: usize,
    normalize: bool,
    query_instruction: Option<String>,
}

impl HashingEmbedder {
    pub fn new(config: &EmbeddingModelConfig) -> Result<Self> {
        if config.dimensions == 0 {
            return Err(anyhow!("Embedding dimension must be greater than 0"));
        }

        Ok(Self {
            model_name: config.name.clone(),
            dimension: config.dimensions,
            normalize: config.normalize,
            query_instruction: config.query_instruction.clone(),
        })
    }

    /// Embeds a single text
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let hash = token_hash(&token);
            let index = (hash % self.dimension as u64) as usize;
            // Top bit picks the sign so collisions tend to cancel out
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            embedding[index] += sign;
        }

        if self.normalize {
            l2_normalize(&mut embedding);
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingEngine for HashingEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String], mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        let inputs = apply_query_instruction(texts, mode, self.query_instruction.as_deref());
        Ok(inputs.iter().map(|text| self.embed(text)).collect())
    }
}

/// First eight bytes of the token's SHA-256 digest, little endian
///
/// Vectors end up in persistent stores, so the hash must not change between
/// builds.
fn token_hash(token: &str) -> u64 {
    let digest = Sha256::digest(token.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Splits text into lowercase word tokens; every CJK character is its own token
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if is_cjk(ch) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(ch.to_string());
        } else if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x4E00..=0x9FFF      // CJK Unified Ideographs
        | 0x3400..=0x4DBF    // Extension A
        | 0x3040..=0x30FF    // Hiragana + Katakana
        | 0xAC00..=0xD7AF)   // Hangul syllables
}
