// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /other/embed_texts HTTP handler

use crate::api::embed::EmbedTextsRequest;
use crate::api::http_server::AppState;
use crate::api::response::{BaseResponse, ERROR_CODE};
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{debug, error};

/// POST /other/embed_texts handler
///
/// Embeds the texts with the named local backend. The HTTP status is always
/// 200; failures are reported through `code` and `msg`.
///
/// # Response Body
/// ```json
/// { "code": 0, "msg": "", "data": [[0.1, 0.2, ...], [0.3, 0.4, ...]] }
/// ```
pub async fn embed_texts_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmbedTextsRequest>,
) -> Json<BaseResponse<Vec<Vec<f32>>>> {
    debug!(
        "embed_texts: {} texts with '{}' (to_query={})",
        request.texts.len(),
        request.embed_model,
        request.to_query
    );

    // Engines are CPU bound, keep them off the async workers
    let dispatcher = state.dispatcher.clone();
    let result = tokio::task::spawn_blocking(move || {
        dispatcher.embed_texts(&request.texts, &request.embed_model, request.to_query)
    })
    .await;

    match result {
        Ok(response) => Json(response),
        Err(e) => {
            error!("Embedding task failed: {}", e);
            Json(BaseResponse::error(ERROR_CODE, format!("Embeddings error: {}", e)))
        }
    }
}
