// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Documents and the parallel-array payload handed to vector stores

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A piece of content with its metadata, as produced by document loaders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Embedded documents in the shape a vector store's bulk insert expects
///
/// `texts[i]`, `embeddings[i]` and `metadatas[i]` always describe the same
/// source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionPayload {
    pub texts: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
    pub metadatas: Vec<Map<String, Value>>,
}

impl IngestionPayload {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Splits documents into parallel text and metadata arrays
pub(crate) fn split_documents(docs: &[Document]) -> (Vec<String>, Vec<Map<String, Value>>) {
    docs.iter()
        .map(|doc| (doc.page_content.clone(), doc.metadata.clone()))
        .unzip()
}
