// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API module
//!
//! POST /other/embed_texts: vectorize a batch of texts with a local backend.

pub mod handler;
pub mod request;

pub use handler::embed_texts_handler;
pub use request::EmbedTextsRequest;
