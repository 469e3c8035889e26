// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Errors raised by chat history stores
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatHistoryError {
    #[error("Chat history not found: {0}")]
    NotFound(String),

    #[error("Chat history already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Chat history store is full ({0} records)")]
    StoreFull(usize),
}
