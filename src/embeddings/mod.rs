// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding backends and dispatch
//!
//! - [`EmbeddingEngine`]: trait every backend implements
//! - [`HashingEmbedder`], [`OnnxEmbedder`]: local engine kinds
//! - [`BackendRegistry`]: name → engine, with a bounded cache of loaded engines
//! - [`EmbeddingDispatcher`]: envelope-producing entry point used by the HTTP layer

pub mod dispatcher;
pub mod document;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod onnx_model;
pub mod registry;

pub use dispatcher::EmbeddingDispatcher;
pub use document::{Document, IngestionPayload};
pub use engine::{EmbedMode, EmbeddingEngine};
pub use errors::EmbeddingError;
pub use hashing::HashingEmbedder;
pub use onnx_model::OnnxEmbedder;
pub use registry::{BackendInfo, BackendRegistry};
