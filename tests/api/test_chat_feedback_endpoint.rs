// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /chat/feedback tests

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chat_webui_server::{
    api::{create_app, AppState},
    chat_history::{ChatHistoryStore, InMemoryChatHistoryStore, NewChatHistory},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn setup() -> (Router, Arc<InMemoryChatHistoryStore>, String) {
    let store = Arc::new(InMemoryChatHistoryStore::new(100));
    let id = store
        .add(
            NewChatHistory::new("chat", "what is a borrow checker?")
                .with_response("It enforces ownership rules at compile time."),
        )
        .await
        .unwrap();

    let state = AppState::new_for_test().with_chat_history(store.clone());
    (create_app(Arc::new(state)), store, id)
}

async fn post_feedback(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/chat/feedback")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_feedback_is_stored() {
    let (app, store, id) = setup().await;

    let (status, body) = post_feedback(
        app,
        json!({"chat_history_id": id, "score": 90, "reason": "clear answer"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["chat_history_id"], id.as_str());
    assert_eq!(body["data"]["feedback_score"], 90);

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.feedback_score, 90);
    assert_eq!(record.feedback_reason, "clear answer");
}

#[tokio::test]
async fn test_unknown_id_is_404_in_envelope() {
    let (app, _, _) = setup().await;

    let (status, body) = post_feedback(
        app,
        json!({"chat_history_id": "does-not-exist", "score": 50}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 404);
    assert!(body["data"].is_null());
    assert!(body["msg"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn test_out_of_range_score_is_400() {
    let (app, store, id) = setup().await;

    let (_, body) = post_feedback(app, json!({"chat_history_id": id, "score": 150})).await;

    assert_eq!(body["code"], 400);
    assert!(body["data"].is_null());

    // Record is untouched
    let record = store.get(&id).await.unwrap().unwrap();
    assert!(!record.is_rated());
}

#[tokio::test]
async fn test_overlong_reason_is_400() {
    let (app, _, id) = setup().await;

    let (_, body) = post_feedback(
        app,
        json!({"chat_history_id": id, "score": 10, "reason": "x".repeat(300)}),
    )
    .await;

    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_exchange_recorded_after_startup_can_be_rated() {
    let (app, store, _) = setup().await;

    let (_, body) = post_feedback(
        app.clone(),
        json!({"chat_history_id": "recorded-later", "score": 10}),
    )
    .await;
    assert_eq!(body["code"], 404);

    // A chat worker records an exchange on the shared store while serving
    store
        .add(NewChatHistory::new("knowledge_base_chat", "what is RAG?").with_id("recorded-later"))
        .await
        .unwrap();

    let (status, body) = post_feedback(
        app,
        json!({"chat_history_id": "recorded-later", "score": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["feedback_score"], 10);
}
