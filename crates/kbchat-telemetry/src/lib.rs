//! Cost reporting for chat invocations: the daily ledger and the run log

mod io;
mod ledger;
mod paths;
mod runlog;
mod types;

pub use io::{append_text, atomic_write, lock_sidecar, open_locked};
pub use ledger::{format_amount, DailyLedger, LedgerError};
pub use paths::{Paths, ReportPaths, DAILY_REPORT_NAME, RUN_LOG_NAME};
pub use runlog::RunLog;
pub use types::LedgerEntry;
