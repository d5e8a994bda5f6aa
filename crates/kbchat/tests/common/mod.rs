#![allow(dead_code)]

use kbchat_core::{
    BoxError, ChainConfig, ChatModel, Document, ModelParams, ModelReply, RetrievalConfig,
    Retriever, TokenUsage,
};
use serde_json::json;

pub const HAIKU: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Knowledge base stand-in returning a fixed passage list
pub struct FixedRetriever {
    pub docs: Vec<Document>,
}

impl Retriever for FixedRetriever {
    fn retrieve(
        &self,
        _knowledge_base_id: &str,
        _query: &str,
        config: &RetrievalConfig,
    ) -> Result<Vec<Document>, BoxError> {
        Ok(self.docs.iter().take(config.number_of_results).cloned().collect())
    }
}

/// Model stand-in answering with a canned reply and fixed token usage
pub struct CannedModel {
    pub text: String,
    pub usage: TokenUsage,
}

impl ChatModel for CannedModel {
    fn invoke(
        &self,
        _model_id: &str,
        _prompt: &str,
        _params: &ModelParams,
    ) -> Result<ModelReply, BoxError> {
        Ok(ModelReply {
            text: self.text.clone(),
            usage: self.usage,
        })
    }
}

pub struct DownRetriever;

impl Retriever for DownRetriever {
    fn retrieve(&self, _: &str, _: &str, _: &RetrievalConfig) -> Result<Vec<Document>, BoxError> {
        Err("knowledge base unavailable".into())
    }
}

pub fn sample_docs() -> Vec<Document> {
    vec![
        Document::new(
            "The Pro plan costs $20 per seat.",
            json!({
                "location": {"s3Location": {"uri": "s3://kb/pricing.pdf"}, "type": "S3"},
                "score": 0.91
            }),
        ),
        Document::new(
            "Enterprise plans include SSO.",
            json!({
                "location": {"type": "WEB"},
                "score": 0.55
            }),
        ),
    ]
}

pub fn sample_config() -> ChainConfig {
    ChainConfig::new("KB123", "us-east-1", HAIKU, ModelParams::new(0.7, 0.9))
}

pub fn canned_model(prompt_tokens: u64, completion_tokens: u64) -> CannedModel {
    CannedModel {
        text: "Hi! The Pro plan is $20 per seat.\n\nBest regards".to_string(),
        usage: TokenUsage {
            prompt_tokens,
            completion_tokens,
        },
    }
}
