// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request body for POST /other/embed_texts

use serde::{Deserialize, Serialize};

/// Request body for POST /other/embed_texts
///
/// # Fields
/// - `texts`: Texts to embed (required, may be empty)
/// - `embed_model`: Backend name (default: `""`, which no backend matches)
/// - `to_query`: Embed as retrieval queries rather than documents (default: false)
///
/// # Example
/// ```json
/// {
///   "texts": ["Hello world", "Another text"],
///   "embed_model": "bge-base",
///   "to_query": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedTextsRequest {
    pub texts: Vec<String>,

    #[serde(default)]
    pub embed_model: String,

    #[serde(default)]
    pub to_query: bool,
}
