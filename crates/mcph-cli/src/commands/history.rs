//! History maintenance subcommands.

use std::process::ExitCode;

use mcph_core::Settings;
use mcph_history::HistoryStore;

use super::{history_store, report_history_error, stdout_colors, terminal_options};
use crate::format::{paint, GREEN, RED};

pub fn clear(settings: &Settings) -> anyhow::Result<ExitCode> {
    match history_store(settings) {
        Ok(store) => Ok(clear_store(&store, stdout_colors())),
        Err(e) => {
            report_history_error(&e, &terminal_options());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn clear_store(store: &HistoryStore, use_colors: bool) -> ExitCode {
    match store.clear() {
        Ok(()) => {
            println!("{}", paint("History cleared successfully.", GREEN, use_colors));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", paint(&format!("Failed to clear history: {e}"), RED, use_colors));
            ExitCode::FAILURE
        }
    }
}

pub fn path(settings: &Settings) -> anyhow::Result<ExitCode> {
    match history_store(settings) {
        Ok(store) => {
            println!("{}", store.path().display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report_history_error(&e, &terminal_options());
            Ok(ExitCode::FAILURE)
        }
    }
}
