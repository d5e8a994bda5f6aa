//! Per-invocation usage log

use crate::io::append_text;
use chrono::NaiveDateTime;
use std::fmt::Display;
use std::path::{Path, PathBuf};

const HEADER_RULE: &str = "########";
const FOOTER_RULE: &str = "!==================!";

/// Append-only log with one block per model invocation
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a block holding the invocation time and its usage summary
    pub fn append<U: Display>(&self, at: NaiveDateTime, usage: &U) -> std::io::Result<()> {
        let block = format!("{at}\n{HEADER_RULE}\n{usage}\n{FOOTER_RULE}\n");
        append_text(&self.path, &block)
    }
}
