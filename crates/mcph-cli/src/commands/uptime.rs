use std::process::ExitCode;

use mcph_core::Settings;

use super::{history_store, report_history_error, OutputArgs};
use crate::format::format_uptime_stats;

/// Print uptime statistics over the retained history.
pub fn run(output: &OutputArgs, settings: &Settings) -> anyhow::Result<ExitCode> {
    let opts = output.format_options();
    let store = match history_store(settings) {
        Ok(store) => store,
        Err(e) => {
            report_history_error(&e, &opts);
            return Ok(ExitCode::FAILURE);
        }
    };
    println!("{}", format_uptime_stats(&store.compute_stats(), &opts));
    Ok(ExitCode::SUCCESS)
}
