//! Citations for the passages a response was grounded on

use crate::metadata::resolve;
use crate::types::Document;
use serde::Serialize;
use serde_json::Value;

/// A retrieved passage as shown back to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    pub page_content: String,
    pub metadata: Value,
}

pub fn extract_citations(context: &[Document]) -> Vec<Citation> {
    context
        .iter()
        .map(|doc| Citation {
            page_content: doc.page_content.clone(),
            metadata: doc.metadata.clone(),
        })
        .collect()
}

/// One numbered row of a citation report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationEntry {
    /// `citation_1`, `citation_2`, ...
    pub key: String,
    pub page_content: String,
    pub source_uri: Option<Value>,
    pub score: Option<Value>,
}

/// Content, source location and relevance score of each citation of a turn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CitationReport {
    pub entries: Vec<CitationEntry>,
}

impl CitationReport {
    /// Build the report, locating each source through `metadata_path`
    pub fn build<S: AsRef<str>>(citations: &[Citation], metadata_path: &[S]) -> Self {
        let entries = citations
            .iter()
            .enumerate()
            .map(|(idx, citation)| CitationEntry {
                key: format!("citation_{}", idx + 1),
                page_content: citation.page_content.clone(),
                source_uri: resolve(&citation.metadata, metadata_path).value().cloned(),
                score: citation.metadata.get("score").cloned(),
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&CitationEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
