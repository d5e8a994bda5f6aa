//! Retrieval → prompt → model chain.
//!
//! The knowledge base and the hosted model are collaborators behind the
//! [`Retriever`] and [`ChatModel`] traits; the chain only wires them
//! together and prices every model call.

use crate::config::{ChainConfig, ModelParams, ModelParamsUpdate, RetrievalConfig};
use crate::pricing::{CostError, CostTracker};
use crate::types::{Document, ModelReply};
use thiserror::Error;
use tracing::debug;

/// Error type returned by collaborators
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[source] BoxError),

    #[error("model invocation failed: {0}")]
    Model(#[source] BoxError),

    #[error(transparent)]
    Cost(#[from] CostError),
}

pub trait Retriever {
    /// Return passages relevant to `query`, most relevant first
    fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        config: &RetrievalConfig,
    ) -> Result<Vec<Document>, BoxError>;
}

pub trait ChatModel {
    fn invoke(
        &self,
        model_id: &str,
        prompt: &str,
        params: &ModelParams,
    ) -> Result<ModelReply, BoxError>;
}

/// Response text plus the passages it was generated from
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutput {
    pub response: String,
    pub context: Vec<Document>,
}

/// Fill `{context}` and `{question}` in a single pass over the template.
///
/// Passages are joined by blank lines. Placeholder-like text inside the
/// substituted values is left alone.
pub fn render_prompt(template: &str, question: &str, context: &[Document]) -> String {
    const CONTEXT: &str = "{context}";
    const QUESTION: &str = "{question}";

    let joined = context
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut out = String::with_capacity(template.len() + joined.len() + question.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix(CONTEXT) {
            out.push_str(&joined);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(QUESTION) {
            out.push_str(question);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

pub struct Chain<R, M> {
    config: ChainConfig,
    retriever: R,
    model: M,
}

impl<R: Retriever, M: ChatModel> Chain<R, M> {
    pub fn new(config: ChainConfig, retriever: R, model: M) -> Self {
        Self {
            config,
            retriever,
            model,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn update_model_id(&mut self, model_id: impl Into<String>) {
        self.config.model_id = model_id.into();
    }

    pub fn update_model_params(&mut self, update: ModelParamsUpdate) {
        self.config.model_params.merge(update);
    }

    pub fn update_prompt_template(&mut self, template: impl Into<String>) {
        self.config.template = template.into();
    }

    pub fn update_retrieval_config(&mut self, retrieval: RetrievalConfig) {
        self.config.retrieval = retrieval;
    }

    pub fn update_knowledge_base_id(&mut self, knowledge_base_id: impl Into<String>) {
        self.config.knowledge_base_id = knowledge_base_id.into();
    }

    /// Answer `question`, pricing the model call into `tracker`
    pub fn invoke(
        &self,
        question: &str,
        tracker: &mut CostTracker,
    ) -> Result<ChainOutput, ChainError> {
        let context = self
            .retriever
            .retrieve(&self.config.knowledge_base_id, question, &self.config.retrieval)
            .map_err(ChainError::Retrieval)?;
        debug!(passages = context.len(), "retrieved context");

        let prompt = render_prompt(&self.config.template, question, &context);
        let reply = self
            .model
            .invoke(&self.config.model_id, &prompt, &self.config.model_params)
            .map_err(ChainError::Model)?;

        let cost = tracker.record(&self.config.model_id, reply.usage)?;
        debug!(
            model = %self.config.model_id,
            prompt_tokens = reply.usage.prompt_tokens,
            completion_tokens = reply.usage.completion_tokens,
            %cost,
            "model call priced"
        );

        Ok(ChainOutput {
            response: reply.text.trim().to_string(),
            context,
        })
    }
}
