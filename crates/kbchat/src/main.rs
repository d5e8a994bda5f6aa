mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::RecordCost { amount, date } => {
            commands::record::run(&amount, date.as_deref())
        }
        Commands::Report { json } => commands::report::run(json),
        Commands::Resolve { metadata, path } => commands::resolve::run(&metadata, path.as_deref()),
        Commands::Estimate {
            model,
            input_tokens,
            output_tokens,
            record,
        } => commands::estimate::run(model.as_deref(), input_tokens, output_tokens, record),
        Commands::Version => commands::version::run(),
    }
}
