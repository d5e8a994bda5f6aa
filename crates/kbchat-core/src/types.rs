//! Values exchanged with the retrieval and model collaborators

use serde::{Deserialize, Serialize};

/// A passage returned by the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    /// Provenance of the passage (source location, relevance score, ...)
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Document {
    pub fn new(page_content: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }
}

/// Token counts reported for a single model call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Generated text plus the usage it cost
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub text: String,
    pub usage: TokenUsage,
}
