//! mcp-health — health monitor for MCP servers configured with the
//! Claude Code CLI.
//!
//! # Usage
//!
//! ```text
//! mcp-health                      # one-shot check, exit 1 on any failure
//! mcp-health --watch --notify -H  # refresh every 30s, alert on flips, keep history
//! mcp-health uptime --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use mcph_core::Settings;

mod commands;
mod format;

use commands::check::CheckArgs;
use commands::OutputArgs;

#[derive(Parser)]
#[command(
    name = "mcp-health",
    about = "Health monitor for MCP servers configured with Claude Code CLI",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(flatten)]
    check: CheckArgs,

    /// Settings file (default: ~/.mcp-health/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show uptime statistics from historical data
    Uptime {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Clear all historical data
    ClearHistory,
    /// Show the path to the history file
    HistoryPath,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mcph=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(cli.settings.as_deref()).with_context(|| match &cli.settings {
        Some(path) => format!("failed to load settings from {}", path.display()),
        None => "failed to load settings".to_string(),
    })?;

    match cli.command {
        None => commands::check::run(cli.check, &settings).await,
        Some(Commands::Uptime { output }) => commands::uptime::run(&output, &settings),
        Some(Commands::ClearHistory) => commands::history::clear(&settings),
        Some(Commands::HistoryPath) => commands::history::path(&settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_is_a_single_check() {
        let cli = Cli::try_parse_from(["mcp-health"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.check.watch);
        assert!(cli.check.timeout.is_none());
    }

    #[test]
    fn check_flags_parse() {
        let cli = Cli::try_parse_from([
            "mcp-health", "-w", "-i", "10", "-t", "500", "-c", "/tmp/c.json", "-n", "-H", "--no-color",
        ])
        .unwrap();
        assert!(cli.check.watch);
        assert_eq!(cli.check.interval, Some(10));
        assert_eq!(cli.check.timeout, Some(500));
        assert_eq!(cli.check.config, Some(PathBuf::from("/tmp/c.json")));
        assert!(cli.check.notify);
        assert!(cli.check.history);
        assert!(cli.check.output.no_color);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Cli::try_parse_from(["mcp-health", "--interval", "0"]).is_err());
    }

    #[test]
    fn uptime_subcommand_takes_output_flags() {
        let cli = Cli::try_parse_from(["mcp-health", "uptime", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Uptime { output }) => assert!(output.json),
            _ => panic!("expected uptime"),
        }
    }

    #[test]
    fn settings_flag_is_global() {
        let cli = Cli::try_parse_from(["mcp-health", "history-path", "--settings", "/tmp/s.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::HistoryPath)));
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.toml")));
    }

    #[test]
    fn clear_history_subcommand() {
        let cli = Cli::try_parse_from(["mcp-health", "clear-history"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ClearHistory)));
    }
}
