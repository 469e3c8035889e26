// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::errors::ChatHistoryError;
use super::model::{
    check_len, check_score, ChatHistory, ChatHistoryFilter, NewChatHistory, MAX_REASON_LEN,
    MAX_TEXT_LEN,
};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Persistence for chat exchanges
#[async_trait]
pub trait ChatHistoryStore: Send + Sync {
    /// Records a new exchange and returns its id
    async fn add(&self, record: NewChatHistory) -> Result<String, ChatHistoryError>;

    /// Replaces the response and/or the metadata of an existing record
    async fn update(
        &self,
        id: &str,
        response: Option<String>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<ChatHistory, ChatHistoryError>;

    /// Stores a user rating for an existing record
    async fn feedback(
        &self,
        id: &str,
        score: i32,
        reason: &str,
    ) -> Result<ChatHistory, ChatHistoryError>;

    async fn get(&self, id: &str) -> Result<Option<ChatHistory>, ChatHistoryError>;

    /// Records matching `filter`, oldest first
    async fn filter(&self, filter: &ChatHistoryFilter) -> Result<Vec<ChatHistory>, ChatHistoryError>;

    async fn count(&self) -> usize;
}

/// Process-local store bounded to `max_records` entries
pub struct InMemoryChatHistoryStore {
    records: RwLock<HashMap<String, ChatHistory>>,
    max_records: usize,
}

impl InMemoryChatHistoryStore {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            max_records,
        }
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }
}

#[async_trait]
impl ChatHistoryStore for InMemoryChatHistoryStore {
    async fn add(&self, record: NewChatHistory) -> Result<String, ChatHistoryError> {
        let record = record.into_record(Utc::now())?;
        let mut records = self.records.write().await;

        if records.contains_key(&record.id) {
            return Err(ChatHistoryError::AlreadyExists(record.id));
        }
        if records.len() >= self.max_records {
            return Err(ChatHistoryError::StoreFull(self.max_records));
        }

        let id = record.id.clone();
        debug!("Recording chat history {} ({})", id, record.chat_type);
        records.insert(id.clone(), record);
        Ok(id)
    }

    async fn update(
        &self,
        id: &str,
        response: Option<String>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<ChatHistory, ChatHistoryError> {
        if let Some(response) = &response {
            check_len("response", response, MAX_TEXT_LEN)?;
        }

        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| ChatHistoryError::NotFound(id.to_string()))?;

        if let Some(response) = response {
            record.response = response;
        }
        if let Some(metadata) = metadata {
            record.meta_data = metadata;
        }
        Ok(record.clone())
    }

    async fn feedback(
        &self,
        id: &str,
        score: i32,
        reason: &str,
    ) -> Result<ChatHistory, ChatHistoryError> {
        check_score(score)?;
        check_len("feedback_reason", reason, MAX_REASON_LEN)?;

        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| ChatHistoryError::NotFound(id.to_string()))?;

        record.feedback_score = score;
        record.feedback_reason = reason.to_string();
        info!("Feedback for chat history {}: score={}", id, score);
        Ok(record.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<ChatHistory>, ChatHistoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn filter(&self, filter: &ChatHistoryFilter) -> Result<Vec<ChatHistory>, ChatHistoryError> {
        let records = self.records.read().await;
        let mut matched: Vec<ChatHistory> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.create_time.cmp(&b.create_time).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}
