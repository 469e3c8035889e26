// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod model;
pub mod store;

pub use errors::ChatHistoryError;
pub use model::{generate_id, ChatHistory, ChatHistoryFilter, NewChatHistory};
pub use store::{ChatHistoryStore, InMemoryChatHistoryStore};
