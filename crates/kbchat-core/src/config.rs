//! Chain configuration and user settings

use kbchat_telemetry::{Paths, ReportPaths, DAILY_REPORT_NAME, RUN_LOG_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Where the source URI of a passage lives in its metadata
pub const DEFAULT_METADATA_PATH: [&str; 3] = ["location", "s3Location", "uri"];

const FACTS_ONLY_TEMPLATE: &str = "\
Human: You are a product sales assistant that writes email replies.
Answer from the facts in the context only. Open by addressing the person who asked,
answer the question plainly, and close politely (for example \"Best regards\").
If the context does not hold enough facts, say that you do not have enough
information instead of inventing any.

CONTEXT:
{context}

USER: {question}
";

const FREE_ROAM_TEMPLATE: &str = "\
Human: You are a product sales assistant that writes email replies.
Use the context to answer concisely. Open by addressing the person who asked,
answer the question plainly, and close politely.
If the context does not hold the answer, offer whatever related information may help.

CONTEXT:
{context}

USER: {question}
";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

/// Sampling parameters sent with every model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub stop_sequences: Vec<String>,
}

impl ModelParams {
    pub fn new(temperature: f64, top_p: f64) -> Self {
        Self {
            max_tokens: 2048,
            temperature,
            top_k: 250,
            top_p,
            stop_sequences: vec!["\n\nHuman".to_string()],
        }
    }

    /// Overwrite only the fields set in `update`
    pub fn merge(&mut self, update: ModelParamsUpdate) {
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(top_k) = update.top_k {
            self.top_k = top_k;
        }
        if let Some(top_p) = update.top_p {
            self.top_p = top_p;
        }
        if let Some(stop_sequences) = update.stop_sequences {
            self.stop_sequences = stop_sequences;
        }
    }
}

/// Partial update of [`ModelParams`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelParamsUpdate {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_k: Option<u32>,
    pub top_p: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    Semantic,
    Hybrid,
}

/// Vector search options passed to the retriever
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub number_of_results: usize,
    pub search_type: SearchType,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            number_of_results: 5,
            search_type: SearchType::Semantic,
        }
    }
}

/// Named chain setups offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Answers strictly from retrieved passages
    #[default]
    FactsOnly,
    /// Fewer hybrid-search passages, allowed to go beyond them
    FreeRoam,
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "facts-only" => Ok(Preset::FactsOnly),
            "free-roam" => Ok(Preset::FreeRoam),
            other => Err(ConfigError::InvalidValue {
                field: "preset",
                reason: format!("unknown preset {other:?}"),
            }),
        }
    }
}

/// Everything needed to assemble a retrieval → prompt → model chain
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    pub knowledge_base_id: String,
    pub region: String,
    pub model_id: String,
    pub model_params: ModelParams,
    pub retrieval: RetrievalConfig,
    pub template: String,
    pub metadata_path: Vec<String>,
}

impl ChainConfig {
    pub fn new(
        knowledge_base_id: impl Into<String>,
        region: impl Into<String>,
        model_id: impl Into<String>,
        model_params: ModelParams,
    ) -> Self {
        Self {
            knowledge_base_id: knowledge_base_id.into(),
            region: region.into(),
            model_id: model_id.into(),
            model_params,
            retrieval: RetrievalConfig::default(),
            template: FACTS_ONLY_TEMPLATE.to_string(),
            metadata_path: DEFAULT_METADATA_PATH.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Apply the retrieval options and template of a preset
    pub fn with_preset(mut self, preset: Preset) -> Self {
        match preset {
            Preset::FactsOnly => {
                self.retrieval = RetrievalConfig::default();
                self.template = FACTS_ONLY_TEMPLATE.to_string();
            }
            Preset::FreeRoam => {
                self.retrieval = RetrievalConfig {
                    number_of_results: 3,
                    search_type: SearchType::Hybrid,
                };
                self.template = FREE_ROAM_TEMPLATE.to_string();
            }
        }
        self
    }
}

/// User settings, read from `~/.kbchat/settings.json` with env overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the cost reports; `~/.kbchat/reports` when unset
    pub reports_dir: Option<PathBuf>,
    pub daily_report_name: String,
    pub run_log_name: String,
    pub knowledge_base_id: String,
    pub region: String,
    pub model_id: String,
    pub temperature: f64,
    pub top_p: f64,
    pub metadata_path: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reports_dir: None,
            daily_report_name: DAILY_REPORT_NAME.to_string(),
            run_log_name: RUN_LOG_NAME.to_string(),
            knowledge_base_id: String::new(),
            region: "us-east-1".to_string(),
            model_id: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
            temperature: 0.7,
            top_p: 0.9,
            metadata_path: DEFAULT_METADATA_PATH.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Load the settings file (defaults when missing), then apply env overrides
    pub fn load(paths: &Paths) -> Result<Self, ConfigError> {
        let mut settings = Self::from_file(&paths.settings_file())?;
        settings.apply_env()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overrides: `KBCHAT_REPORTS_DIR`, `KBCHAT_MODEL_ID`, `KBCHAT_KB_ID`,
    /// and `KBCHAT_KB_ID_FILE` (a file whose content is the knowledge base id)
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(dir) = non_empty_env("KBCHAT_REPORTS_DIR") {
            self.reports_dir = Some(PathBuf::from(dir));
        }
        if let Some(model_id) = non_empty_env("KBCHAT_MODEL_ID") {
            self.model_id = model_id;
        }
        if let Some(id_file) = non_empty_env("KBCHAT_KB_ID_FILE") {
            let path = PathBuf::from(id_file);
            let content = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Read { path, source })?;
            self.knowledge_base_id = content.trim().to_string();
        }
        if let Some(kb_id) = non_empty_env("KBCHAT_KB_ID") {
            self.knowledge_base_id = kb_id;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: format!("{} is outside 0.0..=1.0", self.temperature),
            });
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "top_p",
                reason: format!("{} is outside (0.0, 1.0]", self.top_p),
            });
        }
        if self.daily_report_name.trim().is_empty() || self.run_log_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report names",
                reason: "file names must not be empty".to_string(),
            });
        }
        if self.temperature < 0.1 {
            warn!(
                temperature = self.temperature,
                "temperature near 0 gives nearly deterministic output; 0.7 is a good start"
            );
        }
        Ok(())
    }

    pub fn report_paths(&self, paths: &Paths) -> ReportPaths {
        let dir = self
            .reports_dir
            .clone()
            .unwrap_or_else(|| paths.default_reports_dir());
        ReportPaths::new(&dir, &self.daily_report_name, &self.run_log_name)
    }

    pub fn chain_config(&self, preset: Preset) -> ChainConfig {
        let mut config = ChainConfig::new(
            self.knowledge_base_id.clone(),
            self.region.clone(),
            self.model_id.clone(),
            ModelParams::new(self.temperature, self.top_p),
        )
        .with_preset(preset);
        config.metadata_path = self.metadata_path.clone();
        config
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
