// Support Ticket Triage Agent
// Main entry point for the triage binary

use clap::Parser;
use triage_engine::cli::{Cli, Command};
use triage_engine::config::Config;
use triage_engine::handlers::{handle_doctor, handle_run, handle_tickets, OutputFormat};
use triage_engine::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = Config::load(cli.config.as_deref())?;

    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry(log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.llm.model,
        "triage engine starting"
    );

    match cli.command {
        Command::Run { ticket, verbose } => handle_run(ticket, verbose, &config, format).await,
        Command::Tickets => handle_tickets(format).await,
        Command::Doctor => handle_doctor(&config, format).await,
    }
}
