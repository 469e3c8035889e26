// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request and response bodies for POST /chat/feedback

use crate::chat_history::ChatHistory;
use serde::{Deserialize, Serialize};

/// Rating submitted by a user for one chat exchange
///
/// # Example
/// ```json
/// { "chat_history_id": "5f0c...", "score": 80, "reason": "accurate" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub chat_history_id: String,

    /// 0..=100, higher is better
    #[serde(default)]
    pub score: i32,

    #[serde(default)]
    pub reason: String,
}

/// Payload of a successful feedback envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub chat_history_id: String,
    pub feedback_score: i32,
    pub feedback_reason: String,
}

impl From<ChatHistory> for FeedbackResponse {
    fn from(record: ChatHistory) -> Self {
        Self {
            chat_history_id: record.id,
            feedback_score: record.feedback_score,
            feedback_reason: record.feedback_reason,
        }
    }
}
