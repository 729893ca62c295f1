//! CLI interface for the triage engine
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Support Ticket Triage Agent
///
/// An LLM-driven agent that reads incoming support tickets, gathers
/// customer and knowledge-base context through tool calls, and produces a
/// structured triage decision per ticket.
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Triage the queued tickets
    Run {
        /// Only process the ticket with this id
        #[arg(long, value_name = "ID")]
        ticket: Option<String>,

        /// Show tool calls and retries as they happen
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the tickets waiting in the queue
    Tickets,

    /// Check credentials, configuration, and data fixtures
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["triage", "run"]);
        if let Command::Run { ticket, verbose } = cli.command {
            assert!(ticket.is_none());
            assert!(!verbose);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_run_with_ticket_filter_and_verbose() {
        let cli = Cli::parse_from(["triage", "run", "--ticket", "TKT-1002", "--verbose"]);
        if let Command::Run { ticket, verbose } = cli.command {
            assert_eq!(ticket, Some("TKT-1002".to_string()));
            assert!(verbose);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["triage", "--json", "--log", "debug", "tickets"]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
        assert!(matches!(cli.command, Command::Tickets));
    }

    #[test]
    fn test_doctor_command() {
        let cli = Cli::parse_from(["triage", "doctor"]);
        assert!(matches!(cli.command, Command::Doctor));
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["triage", "--config", "/tmp/triage.toml", "run"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/triage.toml")));
    }
}
