//! Retrieval-augmented chat pipeline: metadata lookup, citations, cost accounting

mod chain;
mod citations;
mod config;
mod metadata;
mod pricing;
mod turn;
mod types;

pub use chain::{render_prompt, BoxError, Chain, ChainError, ChainOutput, ChatModel, Retriever};
pub use citations::{extract_citations, Citation, CitationEntry, CitationReport};
pub use config::{
    ChainConfig, ConfigError, ModelParams, ModelParamsUpdate, Preset, RetrievalConfig,
    SearchType, Settings, DEFAULT_METADATA_PATH,
};
pub use metadata::{resolve, Resolution};
pub use pricing::{pricing_for, CostError, CostTracker, ModelPricing, UsageSummary};
pub use turn::{answer_turn, CostReports, TurnError, TurnOutcome};
pub use types::{Document, ModelReply, TokenUsage};
