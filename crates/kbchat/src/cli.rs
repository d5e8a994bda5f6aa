use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kbchat")]
#[command(version)]
#[command(about = "Knowledge-base chat cost reporting and metadata tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write default settings to ~/.kbchat/settings.json
    Init,

    /// Add a cost to the daily accumulated report
    RecordCost {
        /// Amount in USD, e.g. 0.0002313
        amount: String,

        /// Calendar date to book the cost on (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the accumulated daily costs
    Report {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a nested value in passage metadata
    Resolve {
        /// Path to a JSON metadata file ("-" reads stdin)
        #[arg(short, long)]
        metadata: String,

        /// Dot-separated key path (defaults to the configured metadata path)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Price a model call from its token counts
    Estimate {
        /// Model id (defaults to the configured model)
        #[arg(short, long)]
        model: Option<String>,

        #[arg(long)]
        input_tokens: u64,

        #[arg(long)]
        output_tokens: u64,

        /// Also append the run log and the daily report
        #[arg(long)]
        record: bool,
    },

    /// Print version information
    Version,
}
