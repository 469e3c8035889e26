// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route table served by `GET /docs`
//!
//! Every path registered in `create_app` has exactly one entry here; the
//! route registration tests check the two stay in sync.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub tag: &'static str,
    pub summary: &'static str,
}

pub const INDEX_PATH: &str = "/";
pub const DOCS_PATH: &str = "/docs";
pub const HEALTH_PATH: &str = "/health";
pub const CHAT_FEEDBACK_PATH: &str = "/chat/feedback";
pub const PROMPT_TEMPLATE_PATH: &str = "/server/get_prompt_template";
pub const EMBED_TEXTS_PATH: &str = "/other/embed_texts";
pub const LIST_EMBED_MODELS_PATH: &str = "/other/list_embed_models";

pub static ROUTES: &[RouteInfo] = &[
    RouteInfo {
        method: "GET",
        path: INDEX_PATH,
        tag: "Docs",
        summary: "Redirect to the API documentation",
    },
    RouteInfo {
        method: "GET",
        path: DOCS_PATH,
        tag: "Docs",
        summary: "List registered routes",
    },
    RouteInfo {
        method: "GET",
        path: HEALTH_PATH,
        tag: "Server State",
        summary: "Server health and version",
    },
    RouteInfo {
        method: "POST",
        path: CHAT_FEEDBACK_PATH,
        tag: "Chat",
        summary: "Rate an LLM chat answer",
    },
    RouteInfo {
        method: "POST",
        path: PROMPT_TEMPLATE_PATH,
        tag: "Server State",
        summary: "Get a prompt template configured on the server",
    },
    RouteInfo {
        method: "POST",
        path: EMBED_TEXTS_PATH,
        tag: "Other",
        summary: "Vectorize texts with a local embedding model",
    },
    RouteInfo {
        method: "POST",
        path: LIST_EMBED_MODELS_PATH,
        tag: "Other",
        summary: "List registered embedding models",
    },
];

pub fn find_route(method: &str, path: &str) -> Option<&'static RouteInfo> {
    ROUTES
        .iter()
        .find(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
}
