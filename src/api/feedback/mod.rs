// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod handler;
pub mod request;

pub use handler::chat_feedback_handler;
pub use request::{FeedbackRequest, FeedbackResponse};
