// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX embedding engine
//!
//! Runs sentence-transformer exports (bge, MiniLM, m3e) with ONNX Runtime.
//!
//! Features:
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - Tokenization with truncation to the configured `max_length`
//! - Batched inference with padding to the longest text in the batch
//! - Attention-masked mean pooling over token embeddings
//! - Optional L2 normalization
//! - Output width checked against the configured dimensions at load time

use super::engine::{apply_query_instruction, l2_normalize, EmbedMode, EmbeddingEngine};
use crate::config::EmbeddingModelConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::{info, warn};

/// ONNX-based embedding engine
///
/// All fields are behind `Arc` so the engine clones cheaply into blocking tasks.
#[derive(Clone)]
pub struct OnnxEmbedder {
    /// ONNX Runtime session; `run` needs exclusive access
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
    max_length: usize,
    normalize: bool,
    query_instruction: Option<String>,
}

impl std::fmt::Debug for OnnxEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbedder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

/// Token ids, attention mask and token type ids for one padded batch
struct EncodedBatch {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
    token_type_ids: Array2<i64>,
}

impl OnnxEmbedder {
    /// Loads the model and tokenizer named by `config`
    ///
    /// # Errors
    /// Returns error if:
    /// - `model_path` or `tokenizer_path` is missing or does not exist
    /// - ONNX Runtime cannot build a session on either provider
    /// - A probe inference yields a width other than `config.dimensions`
    pub fn load(config: &EmbeddingModelConfig) -> Result<Self> {
        let model_path = config
            .model_path
            .as_deref()
            .ok_or_else(|| anyhow!("No model_path configured for {}", config.name))?;
        let tokenizer_path = config
            .tokenizer_path
            .as_deref()
            .ok_or_else(|| anyhow!("No tokenizer_path configured for {}", config.name))?;

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let session = build_session(model_path)?;
        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;

        let mut engine = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name: config.name.clone(),
            dimension: config.dimensions,
            max_length: config.max_length,
            normalize: config.normalize,
            query_instruction: config.query_instruction.clone(),
        };

        let probe = engine.infer(&["validation test".to_string()])?;
        let actual = probe.first().map(Vec::len).unwrap_or(0);
        if actual != config.dimensions {
            anyhow::bail!(
                "Model {} dimension mismatch: expected {}, got {}",
                config.name,
                config.dimensions,
                actual
            );
        }
        engine.dimension = actual;

        info!(
            "✓ Loaded ONNX embedding model: {} ({} dimensions)",
            engine.model_name, engine.dimension
        );
        Ok(engine)
    }

    fn encode(&self, texts: &[String]) -> Result<EncodedBatch> {
        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let seq_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len().min(self.max_length))
            .max()
            .unwrap_or(0);

        let rows = texts.len();
        let mut input_ids = Array2::<i64>::zeros((rows, seq_len));
        let mut attention_mask = Array2::<i64>::zeros((rows, seq_len));

        for (row, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids().iter().take(self.max_length);
            let mask = encoding.get_attention_mask().iter().take(self.max_length);
            for (col, (&id, &m)) in ids.zip(mask).enumerate() {
                input_ids[[row, col]] = id as i64;
                attention_mask[[row, col]] = m as i64;
            }
        }

        Ok(EncodedBatch {
            input_ids,
            attention_mask,
            token_type_ids: Array2::<i64>::zeros((rows, seq_len)),
        })
    }

    /// Runs the model on `texts` and mean-pools each row. No normalization.
    fn infer(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let batch = self.encode(texts)?;
        let mask = batch.attention_mask.clone();

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("ONNX session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(batch.input_ids)?,
            "attention_mask" => Value::from_array(batch.attention_mask)?,
            "token_type_ids" => Value::from_array(batch.token_type_ids)?
        ])?;

        // Different exports name the output differently; the first one is
        // token-level embeddings shaped [batch, seq_len, hidden]
        let hidden_states = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;
        let shape = hidden_states.shape();
        if shape.len() != 3 || shape[0] != texts.len() {
            anyhow::bail!(
                "Model outputs unexpected shape: {:?} (expected [{}, seq_len, hidden])",
                shape,
                texts.len()
            );
        }
        let (seq_len, hidden_dim) = (shape[1], shape[2]);

        let mut pooled_batch = Vec::with_capacity(texts.len());
        for row in 0..texts.len() {
            let tokens = hidden_states.index_axis(Axis(0), row);
            let mut pooled = vec![0.0f32; hidden_dim];
            let mut mask_total = 0.0f32;

            for i in 0..seq_len {
                let weight = mask[[row, i]] as f32;
                if weight == 0.0 {
                    continue;
                }
                mask_total += weight;
                for (j, value) in pooled.iter_mut().enumerate() {
                    *value += tokens[[i, j]] * weight;
                }
            }

            for value in &mut pooled {
                *value /= mask_total.max(1e-9);
            }
            pooled_batch.push(pooled);
        }

        Ok(pooled_batch)
    }
}

/// Builds a session on CUDA, falling back to CPU when CUDA is unavailable
fn build_session(model_path: &Path) -> Result<Session> {
    let cuda = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path);

    match cuda {
        Ok(session) => {
            info!("CUDA execution provider initialized for {}", model_path.display());
            Ok(session)
        }
        Err(e) => {
            warn!("CUDA execution provider failed: {}; falling back to CPU", e);
            Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .with_intra_threads(4)
                .context("Failed to set intra threads")?
                .commit_from_file(model_path)
                .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
        }
    }
}

#[async_trait]
impl EmbeddingEngine for OnnxEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String], mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let inputs = apply_query_instruction(texts, mode, self.query_instruction.as_deref());
        let mut embeddings = self.infer(&inputs)?;

        if self.normalize {
            embeddings.iter_mut().for_each(|v| l2_normalize(v));
        }

        Ok(embeddings)
    }

    async fn embed_batch_async(&self, texts: &[String], mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        let engine = self.clone();
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || engine.embed_batch(&texts, mode))
            .await
            .map_err(|e| anyhow!("Embedding task failed: {}", e))?
    }
}
