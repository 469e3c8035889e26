// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;

use crate::config::ServerConfig;

/// Chat WebUI API server
#[derive(Parser, Debug, Default)]
#[command(name = "chat-webui-server")]
#[command(version)]
#[command(about = "HTTP API for the chat web UI: embeddings, prompts and chat feedback", long_about = None)]
pub struct Cli {
    /// Bind host
    #[arg(long, env = "API_HOST")]
    pub host: Option<String>,

    /// Bind port
    #[arg(long, env = "API_PORT")]
    pub port: Option<u16>,

    /// TOML file listing embedding backends
    #[arg(long, env = "EMBEDDING_MODELS_CONFIG")]
    pub embedding_config: Option<PathBuf>,

    /// Skip loading the default embedding model at startup
    #[arg(long)]
    pub no_preload: bool,
}

impl Cli {
    /// Overrides `config` with the values given on the command line
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = &self.embedding_config {
            config.embedding_config_path = Some(path.clone());
        }
        config
    }
}
