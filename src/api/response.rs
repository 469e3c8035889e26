// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Uniform response envelope
//!
//! Every handler answers with `{"code": int, "msg": string, "data": ...}`.
//! Application failures are reported inside the envelope; the HTTP status
//! stays 200.
//!
//! # Example
//! ```json
//! { "code": 0, "msg": "", "data": [[0.12, -0.03, ...], [0.08, 0.11, ...]] }
//! { "code": 500, "msg": "The model foo not support Embeddings feature.", "data": null }
//! ```

use serde::{Deserialize, Serialize};

/// Envelope code for success
pub const SUCCESS_CODE: i32 = 0;

/// Envelope code used when a failure does not name a more specific one
pub const ERROR_CODE: i32 = 500;

/// Response envelope; `data` is present exactly when `code == 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    pub code: i32,
    pub msg: String,
    pub data: Option<T>,
}

/// Envelope whose payload is a list
pub type ListResponse<T> = BaseResponse<Vec<T>>;

impl<T> BaseResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: String::new(),
            data: Some(data),
        }
    }

    /// Failure envelope. A `code` of 0 is replaced by [`ERROR_CODE`] since
    /// a failure can never report success.
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code: if code == SUCCESS_CODE { ERROR_CODE } else { code },
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Consumes the envelope, returning the payload on success
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
