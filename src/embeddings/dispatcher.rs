// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding dispatcher
//!
//! Resolves a backend by name, embeds a batch of texts with it, and folds
//! every outcome into a [`BaseResponse`] envelope. Nothing escapes to the
//! caller: unknown backends, load failures and engine errors all become
//! code 500 envelopes.
//!
//! Two paths exist:
//! - [`EmbeddingDispatcher::embed_texts`] (blocking) checks the backend name
//!   against the registry before loading.
//! - [`EmbeddingDispatcher::aembed_texts`] (async) loads directly and awaits
//!   the engine's async embedding call; any failure is reported the same way.

use super::document::{split_documents, Document, IngestionPayload};
use super::engine::{EmbedMode, EmbeddingEngine};
use super::errors::EmbeddingError;
use super::registry::BackendRegistry;
use crate::api::BaseResponse;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Dispatches embedding requests to registered backends
#[derive(Clone)]
pub struct EmbeddingDispatcher {
    registry: Arc<BackendRegistry>,
}

impl EmbeddingDispatcher {
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    /// Embeds `texts` with the backend named `embed_model`
    ///
    /// # Returns
    /// - `code: 0` with one vector per text, in input order
    /// - `code: 500` with `"The model {name} not support Embeddings feature."`
    ///   if `embed_model` is not a local backend (including `""`)
    /// - `code: 500` with `"Embeddings error: ..."` if loading or embedding failed
    pub fn embed_texts(
        &self,
        texts: &[String],
        embed_model: &str,
        to_query: bool,
    ) -> BaseResponse<Vec<Vec<f32>>> {
        match self.try_embed(texts, embed_model, to_query) {
            Ok(embeddings) => BaseResponse::success(embeddings),
            Err(e) => BaseResponse::error(e.status_code(), e.envelope_message()),
        }
    }

    /// Async variant of [`embed_texts`](Self::embed_texts)
    ///
    /// Skips the local-backend pre-check; every failure, including an
    /// unknown backend, becomes `"errors during text vectorization: ..."`.
    pub async fn aembed_texts(
        &self,
        texts: &[String],
        embed_model: &str,
        to_query: bool,
    ) -> BaseResponse<Vec<Vec<f32>>> {
        let result = match self.registry.load_backend(embed_model) {
            Ok(engine) => {
                let mode = EmbedMode::from_query_flag(to_query);
                match engine.embed_batch_async(texts, mode).await {
                    Ok(embeddings) => check_batch(engine.as_ref(), texts.len(), embeddings),
                    Err(e) => Err(EmbeddingError::Compute {
                        model: embed_model.to_string(),
                        reason: e.to_string(),
                    }),
                }
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(embeddings) => BaseResponse::success(embeddings),
            Err(e) => {
                error!("{}", e);
                BaseResponse::error(e.status_code(), e.async_envelope_message())
            }
        }
    }

    /// Embeds documents into the parallel arrays a vector store ingests
    ///
    /// Fails exactly when [`embed_texts`](Self::embed_texts) would fail on
    /// the documents' texts, with the same error.
    pub fn embed_documents(
        &self,
        docs: &[Document],
        embed_model: &str,
        to_query: bool,
    ) -> Result<IngestionPayload, EmbeddingError> {
        let (texts, metadatas) = split_documents(docs);
        let embeddings = self.try_embed(&texts, embed_model, to_query)?;

        Ok(IngestionPayload {
            texts,
            embeddings,
            metadatas,
        })
    }

    /// Blocking dispatch with the error kept typed
    pub fn try_embed(
        &self,
        texts: &[String],
        embed_model: &str,
        to_query: bool,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if !self.registry.is_local(embed_model) {
            warn!("Embedding requested for unknown model '{}'", embed_model);
            return Err(EmbeddingError::NotSupported {
                model: embed_model.to_string(),
            });
        }

        let engine = self.registry.load_backend(embed_model)?;
        info!("load Embedding Model: {}", embed_model);

        let mode = EmbedMode::from_query_flag(to_query);
        let embeddings = engine.embed_batch(texts, mode).map_err(|e| {
            error!("Embedding with {} failed: {}", embed_model, e);
            EmbeddingError::Compute {
                model: embed_model.to_string(),
                reason: e.to_string(),
            }
        })?;

        check_batch(engine.as_ref(), texts.len(), embeddings)
    }
}

/// Rejects results that would break the text/vector correspondence
fn check_batch(
    engine: &dyn EmbeddingEngine,
    expected: usize,
    embeddings: Vec<Vec<f32>>,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if embeddings.len() != expected {
        return Err(EmbeddingError::BatchSizeMismatch {
            model: engine.model_name().to_string(),
            expected,
            actual: embeddings.len(),
        });
    }

    let dimension = engine.dimension();
    if let Some((index, vector)) = embeddings
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != dimension)
    {
        return Err(EmbeddingError::DimensionMismatch {
            model: engine.model_name().to_string(),
            index,
            expected: dimension,
            actual: vector.len(),
        });
    }

    Ok(embeddings)
}
