// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::http_server::AppState;
use crate::api::response::{BaseResponse, ListResponse};
use crate::api::routes::{RouteInfo, DOCS_PATH, ROUTES};
use crate::embeddings::BackendInfo;
use crate::prompts::PromptKind;
use crate::version::VERSION_NUMBER;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of registered embedding backends
    pub embed_models: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplateRequest {
    #[serde(rename = "type", default)]
    pub kind: PromptKind,
    #[serde(default = "default_template_name")]
    pub name: String,
}

fn default_template_name() -> String {
    "default".to_string()
}

impl Default for PromptTemplateRequest {
    fn default() -> Self {
        Self {
            kind: PromptKind::default(),
            name: default_template_name(),
        }
    }
}

pub async fn index_handler() -> Redirect {
    Redirect::temporary(DOCS_PATH)
}

pub async fn docs_handler() -> Json<&'static [RouteInfo]> {
    Json(ROUTES)
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION_NUMBER.to_string(),
        embed_models: state.dispatcher.registry().model_count(),
    })
}

/// Returns the template text, or `null` when no template has that name
///
/// An empty or whitespace-only body uses the defaults (`llm_chat`/`default`),
/// whatever the content type says; an unknown `type` is rejected with 422.
pub async fn prompt_template_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Option<String>>, JsonRejection> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PromptTemplateRequest::default()
    } else {
        let Json(request) = Json::<PromptTemplateRequest>::from_bytes(&body)?;
        request
    };

    Ok(Json(
        state
            .prompts
            .get(request.kind, &request.name)
            .map(str::to_string),
    ))
}

pub async fn list_embed_models_handler(
    State(state): State<Arc<AppState>>,
) -> Json<ListResponse<BackendInfo>> {
    Json(BaseResponse::success(state.dispatcher.registry().list_models()))
}
