// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Prompt templates served to chat front ends
//!
//! Templates use `{{ input }}`, `{{ context }}` and, for agents,
//! `{{ tools }}` / `{{ tool_names }}` / `{{ agent_scratchpad }}` placeholders.
//! Rendering happens in the LLM workers; this server only hands them out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Template family, one per chat flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    #[default]
    LlmChat,
    KnowledgeBaseChat,
    SearchEngineChat,
    AgentChat,
}

impl PromptKind {
    pub const ALL: [PromptKind; 4] = [
        PromptKind::LlmChat,
        PromptKind::KnowledgeBaseChat,
        PromptKind::SearchEngineChat,
        PromptKind::AgentChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::LlmChat => "llm_chat",
            PromptKind::KnowledgeBaseChat => "knowledge_base_chat",
            PromptKind::SearchEngineChat => "search_engine_chat",
            PromptKind::AgentChat => "agent_chat",
        }
    }
}

const LLM_DEFAULT: &str = "{{ input }}";

const LLM_WITH_HISTORY: &str = "The following is a friendly conversation between a human and an AI. \
The AI is talkative and provides lots of specific details from its context. \
If the AI does not know the answer to a question, it truthfully says it does not know.\n\n\
Current conversation:\n{{ history }}\nHuman: {{ input }}\nAI:";

const KB_DEFAULT: &str = "<instruction>Answer the question concisely and professionally using only the \
known information. If the answer cannot be found in it, say that the question cannot be answered \
from the known information. Do not add made-up content.</instruction>\n\
<known_information>{{ context }}</known_information>\n<question>{{ input }}</question>\n";

const KB_EMPTY: &str = "Please answer my question:\n{{ input }}\n\n";

const SEARCH_DEFAULT: &str = "<instruction>These are search results from the internet. Extract what \
is relevant and answer the question concisely. If no answer can be found, say so. \
Do not add made-up content.</instruction>\n\
<known_information>{{ context }}</known_information>\n<question>{{ input }}</question>\n";

const SEARCH_EMPTY: &str = "Please answer my question:\n{{ input }}\n\n";

const AGENT_DEFAULT: &str = "Answer the following questions as best you can. \
You have access to the following tools:\n\n{{ tools }}\n\n\
Use the following format:\n\
Question: the input question you must answer\n\
Thought: you should always think about what to do\n\
Action: the action to take, should be one of [{{ tool_names }}]\n\
Action Input: the input to the action\n\
Observation: the result of the action\n\
... (this Thought/Action/Action Input/Observation can be repeated zero or more times)\n\
Thought: I now know the final answer\n\
Final Answer: the final answer to the original input question\n\n\
Begin!\n\nQuestion: {{ input }}\nThought: {{ agent_scratchpad }}";

/// Templates keyed by kind and name
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: HashMap<PromptKind, HashMap<String, String>>,
}

impl PromptTemplates {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Built-in templates shipped with the server
    pub fn builtin() -> Self {
        Self::new()
            .with_template(PromptKind::LlmChat, "default", LLM_DEFAULT)
            .with_template(PromptKind::LlmChat, "with_history", LLM_WITH_HISTORY)
            .with_template(PromptKind::KnowledgeBaseChat, "default", KB_DEFAULT)
            .with_template(PromptKind::KnowledgeBaseChat, "empty", KB_EMPTY)
            .with_template(PromptKind::SearchEngineChat, "default", SEARCH_DEFAULT)
            .with_template(PromptKind::SearchEngineChat, "empty", SEARCH_EMPTY)
            .with_template(PromptKind::AgentChat, "default", AGENT_DEFAULT)
    }

    /// Adds or replaces a template
    pub fn with_template(
        mut self,
        kind: PromptKind,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.templates
            .entry(kind)
            .or_default()
            .insert(name.into(), template.into());
        self
    }

    pub fn get(&self, kind: PromptKind, name: &str) -> Option<&str> {
        self.templates
            .get(&kind)
            .and_then(|named| named.get(name))
            .map(String::as_str)
    }

    /// Template names registered for `kind`, sorted
    pub fn names(&self, kind: PromptKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .templates
            .get(&kind)
            .map(|named| named.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}
