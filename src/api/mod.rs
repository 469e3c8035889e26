// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod feedback;
pub mod handlers;
pub mod http_server;
pub mod response;
pub mod routes;

pub use embed::{embed_texts_handler, EmbedTextsRequest};
pub use errors::ApiError;
pub use feedback::{chat_feedback_handler, FeedbackRequest, FeedbackResponse};
pub use handlers::{HealthResponse, PromptTemplateRequest};
pub use http_server::{create_app, start_server, AppState};
pub use response::{BaseResponse, ListResponse, ERROR_CODE, SUCCESS_CODE};
pub use routes::{RouteInfo, ROUTES};
