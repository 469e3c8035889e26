// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding backend registry
//!
//! Maps backend names onto engine configurations and hands out loaded
//! engines. Loading an ONNX model is expensive, so loaded engines are kept
//! in an LRU cache keyed by backend name; `invalidate` and `clear` drop
//! entries explicitly (e.g. after the model files on disk were replaced).
//!
//! Engines registered with [`BackendRegistry::with_engine`] are pinned: they
//! are never evicted and never reloaded.

use super::engine::EmbeddingEngine;
use super::errors::EmbeddingError;
use super::hashing::HashingEmbedder;
use super::onnx_model::OnnxEmbedder;
use crate::config::{BackendKind, EmbeddingModelConfig};
use futures::future::join_all;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

/// Information about a registered backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    /// "onnx", "hashing", or "custom" for pinned engines
    pub kind: String,
    pub dimensions: usize,
    /// Whether an engine instance is currently held in memory
    pub loaded: bool,
}

pub struct BackendRegistry {
    configs: BTreeMap<String, EmbeddingModelConfig>,
    pinned: HashMap<String, Arc<dyn EmbeddingEngine>>,
    cache: Mutex<LruCache<String, Arc<dyn EmbeddingEngine>>>,
}

impl BackendRegistry {
    /// Creates a registry over `models`, caching up to `cache_capacity` loaded engines
    pub fn new(models: Vec<EmbeddingModelConfig>, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        let configs = models
            .into_iter()
            .map(|config| (config.name.clone(), config))
            .collect();

        Self {
            configs,
            pinned: HashMap::new(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Registers an already constructed engine under its own model name
    pub fn with_engine(mut self, engine: Arc<dyn EmbeddingEngine>) -> Self {
        self.pinned.insert(engine.model_name().to_string(), engine);
        self
    }

    /// Names of every backend servable locally
    pub fn list_local_backend_names(&self) -> BTreeSet<String> {
        self.configs
            .keys()
            .chain(self.pinned.keys())
            .cloned()
            .collect()
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.pinned.contains_key(name) || self.configs.contains_key(name)
    }

    pub fn config(&self, name: &str) -> Option<&EmbeddingModelConfig> {
        self.configs.get(name)
    }

    /// Returns a loaded engine for `name`, constructing it on a cache miss
    ///
    /// # Errors
    /// - `NotSupported` if `name` is not registered
    /// - `LoadFailed` if the engine cannot be constructed
    pub fn load_backend(&self, name: &str) -> Result<Arc<dyn EmbeddingEngine>, EmbeddingError> {
        if let Some(engine) = self.pinned.get(name) {
            return Ok(engine.clone());
        }

        let config = self
            .configs
            .get(name)
            .ok_or_else(|| EmbeddingError::NotSupported {
                model: name.to_string(),
            })?;

        if let Some(engine) = self.lock_cache().get(name) {
            return Ok(engine.clone());
        }

        // Load outside the lock so one slow model does not block cache hits
        let engine = build_engine(config).map_err(|e| {
            error!("✗ Failed to load embedding model {}: {}", name, e);
            EmbeddingError::LoadFailed {
                model: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        if let Some((evicted, _)) = self.lock_cache().push(name.to_string(), engine.clone()) {
            if evicted != name {
                info!("Evicted embedding model {} from cache", evicted);
            }
        }

        Ok(engine)
    }

    /// Loads several backends in parallel on the blocking pool
    pub async fn preload(
        self: &Arc<Self>,
        names: Vec<String>,
    ) -> Vec<(String, Result<(), EmbeddingError>)> {
        info!("Preloading {} embedding models in parallel", names.len());

        let tasks = names.into_iter().map(|name| {
            let registry = Arc::clone(self);
            async move {
                let task_name = name.clone();
                let result = tokio::task::spawn_blocking(move || {
                    registry.load_backend(&task_name).map(|_| ())
                })
                .await
                .unwrap_or_else(|e| {
                    Err(EmbeddingError::LoadFailed {
                        model: name.clone(),
                        reason: format!("load task failed: {}", e),
                    })
                });
                if let Err(e) = &result {
                    warn!("Model preload failed: {}", e);
                }
                (name, result)
            }
        });

        join_all(tasks).await
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.pinned.contains_key(name) || self.lock_cache().contains(name)
    }

    /// Drops the cached engine for `name`; the next request reloads it
    pub fn invalidate(&self, name: &str) -> bool {
        self.lock_cache().pop(name).is_some()
    }

    /// Drops every cached engine. Pinned engines are kept.
    pub fn clear(&self) {
        self.lock_cache().clear();
    }

    /// Lists all registered backends sorted by name
    pub fn list_models(&self) -> Vec<BackendInfo> {
        let mut models: Vec<BackendInfo> = self
            .configs
            .values()
            .map(|config| BackendInfo {
                name: config.name.clone(),
                kind: match config.kind {
                    BackendKind::Onnx => "onnx".to_string(),
                    BackendKind::Hashing => "hashing".to_string(),
                },
                dimensions: config.dimensions,
                loaded: self.is_loaded(&config.name),
            })
            .chain(self.pinned.values().map(|engine| BackendInfo {
                name: engine.model_name().to_string(),
                kind: "custom".to_string(),
                dimensions: engine.dimension(),
                loaded: true,
            }))
            .collect();

        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    pub fn model_count(&self) -> usize {
        self.list_local_backend_names().len()
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<String, Arc<dyn EmbeddingEngine>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn build_engine(config: &EmbeddingModelConfig) -> anyhow::Result<Arc<dyn EmbeddingEngine>> {
    info!("Loading embedding model: {} ({:?})", config.name, config.kind);
    let engine: Arc<dyn EmbeddingEngine> = match config.kind {
        BackendKind::Hashing => Arc::new(HashingEmbedder::new(config)?),
        BackendKind::Onnx => Arc::new(OnnxEmbedder::load(config)?),
    };
    Ok(engine)
}
