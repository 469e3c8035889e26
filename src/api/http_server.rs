// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::embed::embed_texts_handler;
use super::feedback::chat_feedback_handler;
use super::handlers::{
    docs_handler, health_handler, index_handler, list_embed_models_handler,
    prompt_template_handler,
};
use super::routes::{
    CHAT_FEEDBACK_PATH, DOCS_PATH, EMBED_TEXTS_PATH, HEALTH_PATH, INDEX_PATH,
    LIST_EMBED_MODELS_PATH, PROMPT_TEMPLATE_PATH,
};
use crate::chat_history::{ChatHistoryStore, InMemoryChatHistoryStore};
use crate::config::{EmbeddingModelConfig, ServerConfig};
use crate::embeddings::{BackendRegistry, EmbeddingDispatcher};
use crate::prompts::PromptTemplates;

/// Shared state handed to every handler
pub struct AppState {
    pub dispatcher: EmbeddingDispatcher,
    /// Written by the chat workers through [`ChatHistoryStore::add`]; the HTTP
    /// surface only reads and rates records
    pub chat_history: Arc<dyn ChatHistoryStore>,
    pub prompts: Arc<PromptTemplates>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig, registry: Arc<BackendRegistry>) -> Self {
        let chat_history = Arc::new(InMemoryChatHistoryStore::new(
            config.chat_history_max_records,
        ));

        Self {
            dispatcher: EmbeddingDispatcher::new(registry),
            chat_history,
            prompts: Arc::new(PromptTemplates::builtin()),
            config,
        }
    }

    /// State with a single 768-dimensional hashing backend named `bge-base`
    pub fn new_for_test() -> Self {
        let registry = BackendRegistry::new(vec![EmbeddingModelConfig::hashing("bge-base", 768)], 2);
        Self::new(ServerConfig::default(), Arc::new(registry))
    }

    /// Shares a store with the chat workers that record exchanges
    pub fn with_chat_history(mut self, store: Arc<dyn ChatHistoryStore>) -> Self {
        self.chat_history = store;
        self
    }
}

/// Builds the router. Routes are fixed once this returns.
pub fn create_app(state: Arc<AppState>) -> Router {
    let open_cross_domain = state.config.open_cross_domain;

    let app = Router::new()
        .route(INDEX_PATH, get(index_handler))
        .route(DOCS_PATH, get(docs_handler))
        .route(HEALTH_PATH, get(health_handler))
        .route(CHAT_FEEDBACK_PATH, post(chat_feedback_handler))
        .route(PROMPT_TEMPLATE_PATH, post(prompt_template_handler))
        .route(EMBED_TEXTS_PATH, post(embed_texts_handler))
        .route(LIST_EMBED_MODELS_PATH, post(list_embed_models_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if open_cross_domain {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

/// Binds the configured address and serves until Ctrl-C
pub async fn start_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.listen_addr()?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C, graceful shutdown disabled: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
