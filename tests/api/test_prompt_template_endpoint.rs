// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /server/get_prompt_template tests

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use chat_webui_server::{
    api::{create_app, AppState},
    prompts::{PromptKind, PromptTemplates},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn post_template(body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(body) => post_raw(Some("application/json"), body.to_string()).await,
        None => post_raw(None, String::new()).await,
    }
}

async fn post_raw(content_type: Option<&str>, body: String) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/server/get_prompt_template");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let app = create_app(Arc::new(AppState::new_for_test()));
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_named_template() {
    let (status, body) =
        post_template(Some(json!({"type": "knowledge_base_chat", "name": "default"}))).await;

    let expected = PromptTemplates::builtin()
        .get(PromptKind::KnowledgeBaseChat, "default")
        .unwrap()
        .to_string();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String(expected));
}

#[tokio::test]
async fn test_defaults_apply_to_empty_object() {
    let (status, body) = post_template(Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("{{ input }}"));
}

#[tokio::test]
async fn test_defaults_apply_without_body() {
    let (status, body) = post_template(None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("{{ input }}"));
}

#[tokio::test]
async fn test_defaults_apply_to_empty_json_body() {
    for body in ["", "  \n"] {
        let (status, body) = post_raw(Some("application/json"), body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("{{ input }}"));
    }
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (status, _) = post_raw(Some("application/json"), "{\"type\":".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_name_is_null() {
    let (status, body) = post_template(Some(json!({"type": "agent_chat", "name": "missing"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_unknown_type_is_rejected() {
    let (status, _) = post_template(Some(json!({"type": "fastchat"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
