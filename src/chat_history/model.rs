// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Chat history record
//!
//! One record per question/answer exchange. The id is generated by the
//! front end so streamed answers can be tied to their record before the
//! server has stored anything.

use super::errors::ChatHistoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const MAX_ID_LEN: usize = 32;
pub const MAX_CHAT_TYPE_LEN: usize = 50;
pub const MAX_TEXT_LEN: usize = 4096;
pub const MAX_REASON_LEN: usize = 255;

/// Score of a record nobody has rated yet
pub const UNRATED_SCORE: i32 = -1;
/// Best possible feedback score
pub const MAX_SCORE: i32 = 100;

/// Stored chat exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    pub id: String,
    /// chat, agent_chat, knowledge_base_chat, ...
    pub chat_type: String,
    pub query: String,
    pub response: String,
    /// Knowledge base ids and other per-exchange context
    pub meta_data: Map<String, Value>,
    /// 0..=100, higher is better; -1 when unrated
    pub feedback_score: i32,
    pub feedback_reason: String,
    pub create_time: DateTime<Utc>,
}

impl ChatHistory {
    pub fn is_rated(&self) -> bool {
        self.feedback_score != UNRATED_SCORE
    }
}

/// Fields supplied when recording a new exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewChatHistory {
    /// Client-generated id; one is generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub chat_type: String,
    pub query: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl NewChatHistory {
    pub fn new(chat_type: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            chat_type: chat_type.into(),
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Validates field lengths and builds the stored record
    pub fn into_record(self, create_time: DateTime<Utc>) -> Result<ChatHistory, ChatHistoryError> {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => generate_id(),
        };

        check_len("id", &id, MAX_ID_LEN)?;
        check_len("chat_type", &self.chat_type, MAX_CHAT_TYPE_LEN)?;
        check_len("query", &self.query, MAX_TEXT_LEN)?;
        check_len("response", &self.response, MAX_TEXT_LEN)?;

        Ok(ChatHistory {
            id,
            chat_type: self.chat_type,
            query: self.query,
            response: self.response,
            meta_data: self.metadata,
            feedback_score: UNRATED_SCORE,
            feedback_reason: String::new(),
            create_time,
        })
    }
}

/// Criteria for listing records; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatHistoryFilter {
    /// Substring of the query
    pub query: Option<String>,
    /// Substring of the response
    pub response: Option<String>,
    /// Exact feedback score
    pub score: Option<i32>,
    /// Substring of the feedback reason
    pub reason: Option<String>,
}

impl ChatHistoryFilter {
    pub fn matches(&self, record: &ChatHistory) -> bool {
        fn contains(needle: &Option<String>, haystack: &str) -> bool {
            needle.as_deref().map_or(true, |n| haystack.contains(n))
        }

        contains(&self.query, &record.query)
            && contains(&self.response, &record.response)
            && contains(&self.reason, &record.feedback_reason)
            && self.score.map_or(true, |s| s == record.feedback_score)
    }
}

/// 32-character id in the same format the front end generates
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), ChatHistoryError> {
    let len = value.chars().count();
    if len > max {
        return Err(ChatHistoryError::Validation {
            field: field.to_string(),
            message: format!("cannot exceed {} characters (got {})", max, len),
        });
    }
    Ok(())
}

pub(crate) fn check_score(score: i32) -> Result<(), ChatHistoryError> {
    if !(0..=MAX_SCORE).contains(&score) {
        return Err(ChatHistoryError::Validation {
            field: "feedback_score".to_string(),
            message: format!("score must be between 0 and {} (got {})", MAX_SCORE, score),
        });
    }
    Ok(())
}
