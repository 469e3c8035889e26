// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbeddingDispatcher tests
//!
//! Covers the envelope contract of both dispatch paths: `data` present
//! exactly when `code == 0`, one vector per text, in input order.

use anyhow::Result;
use async_trait::async_trait;
use chat_webui_server::{
    config::EmbeddingModelConfig,
    embeddings::{BackendRegistry, EmbedMode, EmbeddingDispatcher, EmbeddingEngine, EmbeddingError},
};
use std::sync::Arc;

/// Returns the text length in every slot, so order can be checked
struct LengthEngine;

#[async_trait]
impl EmbeddingEngine for LengthEngine {
    fn model_name(&self) -> &str {
        "length"
    }

    fn dimension(&self) -> usize {
        3
    }

    fn embed_batch(&self, texts: &[String], _mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| vec![t.len() as f32; 3]).collect())
    }
}

struct FailingEngine;

#[async_trait]
impl EmbeddingEngine for FailingEngine {
    fn model_name(&self) -> &str {
        "failing"
    }

    fn dimension(&self) -> usize {
        4
    }

    fn embed_batch(&self, _texts: &[String], _mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        anyhow::bail!("CUDA out of memory")
    }
}

/// Declares 4 dimensions but returns 2
struct NarrowEngine;

#[async_trait]
impl EmbeddingEngine for NarrowEngine {
    fn model_name(&self) -> &str {
        "narrow"
    }

    fn dimension(&self) -> usize {
        4
    }

    fn embed_batch(&self, texts: &[String], _mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

fn dispatcher() -> EmbeddingDispatcher {
    let registry = BackendRegistry::new(
        vec![
            EmbeddingModelConfig::hashing("bge-base", 768),
            EmbeddingModelConfig::onnx(
                "bge-onnx",
                "/nonexistent/model.onnx",
                "/nonexistent/tokenizer.json",
                768,
            ),
        ],
        4,
    )
    .with_engine(Arc::new(LengthEngine))
    .with_engine(Arc::new(FailingEngine))
    .with_engine(Arc::new(NarrowEngine));
    EmbeddingDispatcher::new(Arc::new(registry))
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_hello_world_with_768_dim_backend() {
    let response = dispatcher().embed_texts(&texts(&["hello", "world"]), "bge-base", false);

    assert_eq!(response.code, 0);
    assert_eq!(response.msg, "");
    let data = response.data.unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|v| v.len() == 768));
}

#[test]
fn test_vectors_follow_input_order() {
    let response = dispatcher().embed_texts(&texts(&["a", "abc", "ab"]), "length", false);
    let data = response.data.unwrap();
    assert_eq!(data[0][0], 1.0);
    assert_eq!(data[1][0], 3.0);
    assert_eq!(data[2][0], 2.0);
}

#[test]
fn test_empty_backend_name() {
    let response = dispatcher().embed_texts(&texts(&["hello"]), "", false);

    assert_eq!(response.code, 500);
    assert_eq!(response.msg, "The model  not support Embeddings feature.");
    assert!(response.data.is_none());
}

#[test]
fn test_unknown_backend_for_any_batch() {
    let batches = [texts(&[]), texts(&["one"]), texts(&["a", "b", "c"])];
    for batch in &batches {
        let response = dispatcher().embed_texts(batch, "gpt-4", true);
        assert_eq!(response.code, 500);
        assert!(response.data.is_none());
    }
}

#[test]
fn test_engine_error_text_is_reported() {
    let response = dispatcher().embed_texts(&texts(&["hello"]), "failing", false);

    assert_eq!(response.code, 500);
    assert!(response.msg.contains("CUDA out of memory"));
    assert!(response.msg.starts_with("Embeddings error: "));
    assert!(response.data.is_none());
}

#[test]
fn test_load_failure_is_reported() {
    let response = dispatcher().embed_texts(&texts(&["hello"]), "bge-onnx", false);

    assert_eq!(response.code, 500);
    assert!(response
        .msg
        .starts_with("Embeddings error: failed to load embedding model 'bge-onnx'"));
    assert!(response.data.is_none());
}

#[test]
fn test_dimension_mismatch_is_an_error() {
    let err = dispatcher()
        .try_embed(&texts(&["x"]), "narrow", false)
        .unwrap_err();

    assert_eq!(
        err,
        EmbeddingError::DimensionMismatch {
            model: "narrow".to_string(),
            index: 0,
            expected: 4,
            actual: 2,
        }
    );
}

#[test]
fn test_deterministic_backend_is_repeatable() {
    let dispatcher = dispatcher();
    let batch = texts(&["向量化测试", "vectorization test"]);

    let first = dispatcher.embed_texts(&batch, "bge-base", true);
    let second = dispatcher.embed_texts(&batch, "bge-base", true);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_async_path_matches_blocking_on_success() {
    let dispatcher = dispatcher();
    let batch = texts(&["hello", "world"]);

    let blocking = dispatcher.embed_texts(&batch, "bge-base", false);
    let async_response = dispatcher.aembed_texts(&batch, "bge-base", false).await;
    assert_eq!(blocking, async_response);
}

#[tokio::test]
async fn test_async_path_prefixes_every_failure() {
    let dispatcher = dispatcher();

    let response = dispatcher.aembed_texts(&texts(&["x"]), "failing", false).await;
    assert_eq!(response.code, 500);
    assert_eq!(
        response.msg,
        "errors during text vectorization: CUDA out of memory"
    );
    assert!(response.data.is_none());

    let response = dispatcher.aembed_texts(&texts(&["x"]), "", false).await;
    assert_eq!(
        response.msg,
        "errors during text vectorization: The model  not support Embeddings feature."
    );

    let response = dispatcher.aembed_texts(&texts(&["x"]), "bge-onnx", false).await;
    assert_eq!(response.code, 500);
    assert!(
        response.msg.starts_with(
            "errors during text vectorization: failed to load embedding model 'bge-onnx': "
        ),
        "{}",
        response.msg
    );
    assert!(response.data.is_none());
}

#[test]
fn test_async_path_from_sync_context() {
    let dispatcher = dispatcher();
    let response =
        tokio_test::block_on(dispatcher.aembed_texts(&texts(&["hello"]), "length", false));
    assert_eq!(response.data, Some(vec![vec![5.0; 3]]));
}
