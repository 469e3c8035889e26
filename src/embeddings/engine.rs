// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding engine trait
//!
//! An engine turns a batch of texts into fixed-width vectors. Local engines
//! are constructed by the [`BackendRegistry`](super::BackendRegistry) and
//! shared behind `Arc<dyn EmbeddingEngine>`.

use anyhow::Result;
use async_trait::async_trait;

/// Whether vectors are produced for storage or for retrieval queries
///
/// Some models (bge, Minimax) optimize the two differently; engines without
/// a query instruction treat both modes the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedMode {
    #[default]
    Document,
    Query,
}

impl EmbedMode {
    /// Maps the wire-level `to_query` flag onto a mode
    pub fn from_query_flag(to_query: bool) -> Self {
        if to_query {
            EmbedMode::Query
        } else {
            EmbedMode::Document
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, EmbedMode::Query)
    }
}

/// Trait implemented by every embedding backend
#[async_trait]
pub trait EmbeddingEngine: Send + Sync {
    /// Backend name this engine was loaded for
    fn model_name(&self) -> &str;

    /// Width of every vector this engine produces
    fn dimension(&self) -> usize;

    /// Embeds the whole batch in one call.
    ///
    /// The returned vector at index `i` belongs to `texts[i]`.
    fn embed_batch(&self, texts: &[String], mode: EmbedMode) -> Result<Vec<Vec<f32>>>;

    /// Non-blocking variant of [`embed_batch`](Self::embed_batch).
    ///
    /// Engines that do real work should override this to move inference off
    /// the async executor.
    async fn embed_batch_async(&self, texts: &[String], mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        self.embed_batch(texts, mode)
    }
}

/// Prefixes each text with the query instruction when embedding in query mode
pub(crate) fn apply_query_instruction(
    texts: &[String],
    mode: EmbedMode,
    instruction: Option<&str>,
) -> Vec<String> {
    match (mode, instruction) {
        (EmbedMode::Query, Some(prefix)) if !prefix.is_empty() => texts
            .iter()
            .map(|text| format!("{}{}", prefix, text))
            .collect(),
        _ => texts.to_vec(),
    }
}

/// Scales a vector to unit length in place. Zero vectors are left untouched.
pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
