// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod chat_history;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod prompts;
pub mod version;

pub use api::{create_app, AppState, BaseResponse, ListResponse};
pub use chat_history::{ChatHistory, ChatHistoryStore, InMemoryChatHistoryStore};
pub use config::{EmbeddingModelConfig, EmbeddingModelsConfig, ServerConfig};
pub use embeddings::{BackendRegistry, Document, EmbeddingDispatcher, IngestionPayload};
