//! Per-model token pricing and per-turn cost accumulation.
//!
//! Amounts are [`rust_decimal::Decimal`] so the daily ledger sums exact
//! values instead of floating-point approximations.

use crate::types::TokenUsage;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CostError {
    #[error("no pricing known for model {0:?}")]
    UnknownModel(String),
}

/// USD price per thousand tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelPricing {
    pub input_per_1k: Decimal,
    pub output_per_1k: Decimal,
}

impl ModelPricing {
    pub fn cost(&self, usage: &TokenUsage) -> Decimal {
        let input = Decimal::from(usage.prompt_tokens) * self.input_per_1k;
        let output = Decimal::from(usage.completion_tokens) * self.output_per_1k;
        (input + output) / Decimal::ONE_THOUSAND
    }
}

/// Built-in price table for the hosted Anthropic models
pub fn pricing_for(model_id: &str) -> Option<ModelPricing> {
    let (input, output) = match model_id {
        "anthropic.claude-instant-v1" => (Decimal::new(8, 4), Decimal::new(24, 4)),
        "anthropic.claude-v2" | "anthropic.claude-v2:1" => {
            (Decimal::new(8, 3), Decimal::new(24, 3))
        }
        "anthropic.claude-3-sonnet-20240229-v1:0" => (Decimal::new(3, 3), Decimal::new(15, 3)),
        "anthropic.claude-3-haiku-20240307-v1:0" => (Decimal::new(25, 5), Decimal::new(125, 5)),
        _ => return None,
    };
    Some(ModelPricing {
        input_per_1k: input,
        output_per_1k: output,
    })
}

/// Accumulates usage across every model call made while answering a turn
#[derive(Debug, Clone, Default)]
pub struct CostTracker {
    prompt_tokens: u64,
    completion_tokens: u64,
    successful_requests: u32,
    total_cost: Decimal,
}

impl CostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price and record one successful call, returning its cost
    pub fn record(&mut self, model_id: &str, usage: TokenUsage) -> Result<Decimal, CostError> {
        let pricing =
            pricing_for(model_id).ok_or_else(|| CostError::UnknownModel(model_id.to_string()))?;
        let cost = pricing.cost(&usage);

        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.successful_requests += 1;
        self.total_cost += cost;
        Ok(cost)
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    pub fn summary(&self) -> UsageSummary {
        UsageSummary {
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
            successful_requests: self.successful_requests,
            total_cost: self.total_cost,
        }
    }
}

/// Snapshot of a [`CostTracker`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub successful_requests: u32,
    pub total_cost: Decimal,
}

impl UsageSummary {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tokens Used: {}\n\tPrompt Tokens: {}\n\tCompletion Tokens: {}\n\
             Successful Requests: {}\nTotal Cost (USD): ${}",
            self.total_tokens(),
            self.prompt_tokens,
            self.completion_tokens,
            self.successful_requests,
            self.total_cost.normalize()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const HAIKU: &str = "anthropic.claude-3-haiku-20240307-v1:0";
    const SONNET: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

    fn usage(prompt: u64, completion: u64) -> TokenUsage {
        TokenUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
        }
    }

    #[test]
    fn test_haiku_cost() {
        let pricing = pricing_for(HAIKU).unwrap();
        // 1000 * 0.00025 / 1000 + 200 * 0.00125 / 1000
        assert_eq!(
            pricing.cost(&usage(1000, 200)),
            Decimal::from_str("0.0005").unwrap()
        );
    }

    #[test]
    fn test_unknown_model() {
        let mut tracker = CostTracker::new();
        let err = tracker.record("meta.llama3", usage(10, 10)).unwrap_err();
        assert_eq!(err, CostError::UnknownModel("meta.llama3".to_string()));
        assert_eq!(tracker.summary(), UsageSummary::default());
    }

    #[test]
    fn test_tracker_accumulates_calls() {
        let mut tracker = CostTracker::new();
        tracker.record(SONNET, usage(2000, 100)).unwrap();
        tracker.record(HAIKU, usage(400, 40)).unwrap();

        let summary = tracker.summary();
        assert_eq!(summary.prompt_tokens, 2400);
        assert_eq!(summary.completion_tokens, 140);
        assert_eq!(summary.successful_requests, 2);
        // (6 + 1.5) / 1000 + (0.1 + 0.05) / 1000
        assert_eq!(summary.total_cost, Decimal::from_str("0.00765").unwrap());
        assert_eq!(tracker.total_cost(), summary.total_cost);
    }

    #[test]
    fn test_summary_display() {
        let mut tracker = CostTracker::new();
        tracker.record(HAIKU, usage(1000, 200)).unwrap();

        assert_eq!(
            tracker.summary().to_string(),
            "Tokens Used: 1200\n\tPrompt Tokens: 1000\n\tCompletion Tokens: 200\n\
             Successful Requests: 1\nTotal Cost (USD): $0.0005"
        );
    }
}
