// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::response::BaseResponse;
use crate::chat_history::ChatHistoryError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    NotFound(String),
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    ServiceUnavailable(String),
    InternalError(String),
}

impl ApiError {
    /// Envelope code reported for this error
    pub fn code(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::InternalError(_) => 500,
        }
    }

    pub fn to_response<T>(&self) -> BaseResponse<T> {
        BaseResponse::error(self.code(), self.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ChatHistoryError> for ApiError {
    fn from(e: ChatHistoryError) -> Self {
        match e {
            ChatHistoryError::NotFound(id) => ApiError::NotFound(format!("chat history {}", id)),
            ChatHistoryError::Validation { field, message } => {
                ApiError::ValidationError { field, message }
            }
            ChatHistoryError::AlreadyExists(id) => {
                ApiError::InvalidRequest(format!("chat history {} already exists", id))
            }
            e @ ChatHistoryError::StoreFull(_) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}
