//! One user turn: answer, log usage, accumulate daily cost, cite sources

use crate::chain::{Chain, ChainError, ChatModel, Retriever};
use crate::citations::{extract_citations, CitationReport};
use crate::pricing::{CostTracker, UsageSummary};
use chrono::NaiveDateTime;
use kbchat_telemetry::{DailyLedger, LedgerError, ReportPaths, RunLog};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("failed to append run log: {0}")]
    RunLog(#[from] std::io::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// The two report sinks a turn writes its cost to
#[derive(Debug, Clone)]
pub struct CostReports {
    pub ledger: DailyLedger,
    pub run_log: RunLog,
}

impl CostReports {
    pub fn new(paths: &ReportPaths) -> Self {
        Self {
            ledger: DailyLedger::new(&paths.daily_report),
            run_log: RunLog::new(&paths.run_log),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub response: String,
    pub citations: CitationReport,
    pub usage: UsageSummary,
}

/// Answer `question` at time `at`, recording what it cost.
///
/// Nothing is written when the chain fails.
pub fn answer_turn<R: Retriever, M: ChatModel>(
    chain: &Chain<R, M>,
    reports: &CostReports,
    question: &str,
    at: NaiveDateTime,
) -> Result<TurnOutcome, TurnError> {
    let mut tracker = CostTracker::new();
    let output = chain.invoke(question, &mut tracker)?;
    let usage = tracker.summary();

    reports.run_log.append(at, &usage)?;
    reports.ledger.record_cost(usage.total_cost, at)?;
    info!(
        cost = %usage.total_cost,
        tokens = usage.total_tokens(),
        "turn cost recorded"
    );

    let citations = extract_citations(&output.context);
    let citations = CitationReport::build(&citations, &chain.config().metadata_path);

    Ok(TurnOutcome {
        response: output.response,
        citations,
        usage,
    })
}
