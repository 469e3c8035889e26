// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use chat_webui_server::{
    api::{start_server, AppState},
    cli::Cli,
    config::{EmbeddingModelConfig, EmbeddingModelsConfig, ServerConfig},
    embeddings::BackendRegistry,
    version,
};
use clap::Parser;
use std::{env, sync::Arc};
use tracing::{info, warn};

/// Hashing backend registered when no backends file is given
const FALLBACK_MODEL: &str = "hashing-768";
const FALLBACK_DIMENSIONS: usize = 768;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let cli = Cli::parse();
    let config = cli.apply(ServerConfig::from_env());
    config.validate()?;

    let models = load_models(&config)?;
    info!(
        "Registered embedding models: {}",
        models.names().join(", ")
    );

    let registry = Arc::new(BackendRegistry::new(
        models.models,
        config.embedding_cache_size,
    ));

    let default_model = match config.embedding_config_path {
        Some(_) => config.default_embedding_model.clone(),
        None => FALLBACK_MODEL.to_string(),
    };
    if cli.no_preload {
        info!("Skipping embedding model preload");
    } else if registry.is_local(&default_model) {
        for (name, result) in registry.preload(vec![default_model]).await {
            if result.is_ok() {
                info!("Preloaded embedding model {}", name);
            }
        }
    } else {
        warn!(
            "Default embedding model '{}' is not registered, nothing preloaded",
            default_model
        );
    }

    let state = Arc::new(AppState::new(config, registry));
    start_server(state).await
}

fn load_models(config: &ServerConfig) -> Result<EmbeddingModelsConfig> {
    match &config.embedding_config_path {
        Some(path) => {
            info!("Loading embedding models from {}", path.display());
            Ok(EmbeddingModelsConfig::from_file(path)?)
        }
        None => {
            warn!(
                "EMBEDDING_MODELS_CONFIG not set, only the '{}' feature-hashing backend is available",
                FALLBACK_MODEL
            );
            Ok(fallback_models())
        }
    }
}

fn fallback_models() -> EmbeddingModelsConfig {
    EmbeddingModelsConfig {
        models: vec![EmbeddingModelConfig::hashing(
            FALLBACK_MODEL,
            FALLBACK_DIMENSIONS,
        )],
    }
}
