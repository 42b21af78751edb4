pub mod check;
pub mod history;
pub mod uptime;

use std::io::IsTerminal;

use clap::Args;
use serde_json::json;

use mcph_core::{HealthCheckError, Settings};
use mcph_history::{HistoryError, HistoryResult, HistoryStore};

use crate::format::{FormatOptions, RED};

/// Output selection shared by every command that renders data.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
    /// Output as plain text (no colors or formatting)
    #[arg(long)]
    pub plain: bool,
    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl OutputArgs {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions::resolve(self.json, self.plain, self.no_color)
    }
}

/// History log from settings, else `~/.mcp-health/history.json`.
pub fn history_store(settings: &Settings) -> HistoryResult<HistoryStore> {
    match &settings.history_path {
        Some(path) => Ok(HistoryStore::new(path)),
        None => HistoryStore::open_default(),
    }
}

/// Print a fatal check error the way the active output mode expects.
pub fn report_check_error(err: &HealthCheckError, opts: &FormatOptions) {
    report(&err.to_string(), Some(err.code()), opts);
}

/// Print a history failure the way the active output mode expects.
pub fn report_history_error(err: &HistoryError, opts: &FormatOptions) {
    report(&err.to_string(), Some(err.code()), opts);
}

pub fn report(message: &str, code: Option<&str>, opts: &FormatOptions) {
    if opts.is_json() {
        let body = match code {
            Some(code) => json!({ "error": message, "code": code }),
            None => json!({ "error": message }),
        };
        println!("{body}");
    } else {
        eprintln!("{} {message}", opts.paint("Error:", RED));
    }
}

pub(crate) fn stdout_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Options for commands that have no output flags of their own.
pub(crate) fn terminal_options() -> FormatOptions {
    FormatOptions::resolve(false, false, !stdout_colors())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_history_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let settings = Settings {
            history_path: Some(path.clone()),
            ..Settings::default()
        };
        assert_eq!(history_store(&settings).unwrap().path(), path);
    }

    #[test]
    fn output_args_map_to_format() {
        let args = OutputArgs { json: false, plain: true, no_color: false };
        let opts = args.format_options();
        assert_eq!(opts.format, crate::format::OutputFormat::Plain);
        assert!(!opts.use_colors);
    }
}
