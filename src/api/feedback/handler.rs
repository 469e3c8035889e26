// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /chat/feedback HTTP handler

use super::request::{FeedbackRequest, FeedbackResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::response::BaseResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::warn;

/// POST /chat/feedback - rate a stored chat exchange
///
/// No route creates chat records. The chat workers write them through
/// [`ChatHistoryStore::add`](crate::chat_history::ChatHistoryStore::add) on the
/// store passed to [`AppState::with_chat_history`]; until a worker has recorded
/// an exchange every id answers 404.
///
/// # Errors (reported in the envelope, transport status 200)
/// - 400: score outside 0..=100 or reason longer than 255 characters
/// - 404: unknown `chat_history_id`
pub async fn chat_feedback_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedbackRequest>,
) -> Json<BaseResponse<FeedbackResponse>> {
    let result = state
        .chat_history
        .feedback(&request.chat_history_id, request.score, &request.reason)
        .await;

    match result {
        Ok(record) => Json(BaseResponse::success(record.into())),
        Err(e) => {
            warn!("Feedback for {} rejected: {}", request.chat_history_id, e);
            Json(ApiError::from(e).to_response())
        }
    }
}
