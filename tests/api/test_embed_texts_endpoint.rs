// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /other/embed_texts tests
//!
//! The endpoint always answers 200 for a well-formed body; success and
//! failure are told apart by the envelope's `code`.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chat_webui_server::{
    api::{create_app, AppState},
    config::{EmbeddingModelConfig, ServerConfig},
    embeddings::{BackendRegistry, EmbedMode, EmbeddingEngine},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

struct FailingEngine;

#[async_trait]
impl EmbeddingEngine for FailingEngine {
    fn model_name(&self) -> &str {
        "broken"
    }

    fn dimension(&self) -> usize {
        8
    }

    fn embed_batch(&self, _texts: &[String], _mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        anyhow::bail!("engine exploded")
    }
}

fn app() -> Router {
    let registry = BackendRegistry::new(
        vec![
            EmbeddingModelConfig::hashing("bge-base", 768),
            EmbeddingModelConfig::hashing("hash-query", 32).with_query_instruction("query: "),
        ],
        4,
    )
    .with_engine(Arc::new(FailingEngine));
    let state = AppState::new(ServerConfig::default(), Arc::new(registry));
    create_app(Arc::new(state))
}

async fn post_embed(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/other/embed_texts")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_embed_two_texts_with_768_dim_backend() {
    let (status, body) = post_embed(
        app(),
        json!({"texts": ["hello", "world"], "embed_model": "bge-base", "to_query": false}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["msg"], "");

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    for vector in data {
        assert_eq!(vector.as_array().unwrap().len(), 768);
    }
}

#[tokio::test]
async fn test_missing_model_defaults_to_empty_name() {
    let (status, body) = post_embed(app(), json!({"texts": ["hello"]})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "code": 500,
            "msg": "The model  not support Embeddings feature.",
            "data": null
        })
    );
}

#[tokio::test]
async fn test_unknown_model_reports_500_in_envelope() {
    let (status, body) = post_embed(
        app(),
        json!({"texts": ["hello"], "embed_model": "text-embedding-ada-002"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 500);
    assert_eq!(
        body["msg"],
        "The model text-embedding-ada-002 not support Embeddings feature."
    );
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_engine_failure_is_wrapped() {
    let (status, body) = post_embed(
        app(),
        json!({"texts": ["hello"], "embed_model": "broken"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 500);
    assert_eq!(body["msg"], "Embeddings error: engine exploded");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_empty_texts_succeeds() {
    let (status, body) = post_embed(
        app(),
        json!({"texts": [], "embed_model": "bge-base"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"code": 0, "msg": "", "data": []}));
}

#[tokio::test]
async fn test_to_query_changes_vectors() {
    let texts = json!(["how are embeddings computed"]);

    let (_, document) = post_embed(
        app(),
        json!({"texts": texts.clone(), "embed_model": "hash-query", "to_query": false}),
    )
    .await;
    let (_, query) = post_embed(
        app(),
        json!({"texts": texts, "embed_model": "hash-query", "to_query": true}),
    )
    .await;

    assert_eq!(document["code"], 0);
    assert_eq!(query["code"], 0);
    assert_ne!(document["data"], query["data"]);
}

#[tokio::test]
async fn test_repeated_calls_are_deterministic() {
    let body = json!({"texts": ["same input"], "embed_model": "bge-base"});
    let (_, first) = post_embed(app(), body.clone()).await;
    let (_, second) = post_embed(app(), body).await;
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_missing_texts_is_rejected_by_extractor() {
    let (status, _) = post_embed(app(), json!({"embed_model": "bge-base"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/other/embed_texts")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
