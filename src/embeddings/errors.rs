// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for embedding dispatch
//!
//! The outward envelope reports every failure as code 500, but the variants
//! stay distinct so callers and tests can tell an unknown backend from a
//! backend that failed to load or to compute.

use thiserror::Error;

/// Errors that can occur while resolving a backend or embedding a batch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// Backend name is not registered as a local embedding model
    #[error("The model {model} not support Embeddings feature.")]
    NotSupported { model: String },

    /// Backend is registered but its engine could not be constructed
    #[error("failed to load embedding model '{model}': {reason}")]
    LoadFailed { model: String, reason: String },

    /// Engine raised while embedding the batch
    #[error("{reason}")]
    Compute { model: String, reason: String },

    /// Engine returned a different number of vectors than texts submitted
    #[error("model '{model}' returned {actual} embeddings for {expected} texts")]
    BatchSizeMismatch {
        model: String,
        expected: usize,
        actual: usize,
    },

    /// Engine returned a vector whose width differs from its declared dimension
    #[error("model '{model}' returned a {actual}-dimensional vector at index {index}, expected {expected}")]
    DimensionMismatch {
        model: String,
        index: usize,
        expected: usize,
        actual: usize,
    },
}

impl EmbeddingError {
    /// Envelope code for this error. Every embedding failure is reported as 500.
    pub fn status_code(&self) -> i32 {
        500
    }

    /// Backend name the error refers to
    pub fn model(&self) -> &str {
        match self {
            EmbeddingError::NotSupported { model }
            | EmbeddingError::LoadFailed { model, .. }
            | EmbeddingError::Compute { model, .. }
            | EmbeddingError::BatchSizeMismatch { model, .. }
            | EmbeddingError::DimensionMismatch { model, .. } => model,
        }
    }

    /// Message used by the blocking dispatch path.
    ///
    /// An unknown backend keeps its plain message; everything that happened
    /// after the backend was resolved is prefixed with `Embeddings error:`.
    pub fn envelope_message(&self) -> String {
        match self {
            EmbeddingError::NotSupported { .. } => self.to_string(),
            _ => format!("Embeddings error: {}", self),
        }
    }

    /// Message used by the async dispatch path, which does not pre-check the backend.
    pub fn async_envelope_message(&self) -> String {
        format!("errors during text vectorization: {}", self)
    }
}
