// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration loaded from environment variables

use super::ConfigError;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the HTTP server and its collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allow cross-origin requests from any origin
    pub open_cross_domain: bool,
    /// TOML file listing embedding backends
    pub embedding_config_path: Option<PathBuf>,
    /// Backend loaded eagerly at startup
    pub default_embedding_model: String,
    /// Number of loaded embedding engines kept in memory
    pub embedding_cache_size: usize,
    /// Upper bound on chat history records held by the in-memory store
    pub chat_history_max_records: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("API_HOST").unwrap_or(defaults.host),
            port: lookup("API_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            open_cross_domain: lookup("OPEN_CROSS_DOMAIN")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.open_cross_domain),
            embedding_config_path: lookup("EMBEDDING_MODELS_CONFIG").map(PathBuf::from),
            default_embedding_model: lookup("DEFAULT_EMBEDDING_MODEL")
                .unwrap_or(defaults.default_embedding_model),
            embedding_cache_size: lookup("EMBEDDING_CACHE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.embedding_cache_size),
            chat_history_max_records: lookup("CHAT_HISTORY_MAX_RECORDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.chat_history_max_records),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                field: "API_PORT".to_string(),
                message: "port must be greater than 0".to_string(),
            });
        }
        if self.embedding_cache_size == 0 {
            return Err(ConfigError::Invalid {
                field: "EMBEDDING_CACHE_SIZE".to_string(),
                message: "cache size must be greater than 0".to_string(),
            });
        }
        if self.chat_history_max_records == 0 {
            return Err(ConfigError::Invalid {
                field: "CHAT_HISTORY_MAX_RECORDS".to_string(),
                message: "max records must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                field: "API_HOST".to_string(),
                message: e.to_string(),
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7861,
            open_cross_domain: false,
            embedding_config_path: None,
            default_embedding_model: "bge-base".to_string(),
            embedding_cache_size: 4,
            chat_history_max_records: 100_000,
        }
    }
}
