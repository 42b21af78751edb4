//! Default command: single-shot check or watch loop.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use mcph_core::Settings;
use mcph_health::{HealthChecker, ProbeTool, DEFAULT_TOOL, PER_SERVER_TIMEOUT_MS};
use mcph_history::HistoryStore;
use mcph_notify::{NotificationOptions, Notifier};

use super::{history_store, report, report_check_error, report_history_error, OutputArgs};
use crate::format::{format_health_result, FormatOptions, CYAN};

pub const DEFAULT_INTERVAL_SECS: u64 = 30;

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub output: OutputArgs,
    /// Watch mode: auto-refresh status
    #[arg(short, long)]
    pub watch: bool,
    /// Refresh interval in seconds (default: 30)
    #[arg(short, long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
    /// Timeout for each server check in milliseconds (default: 3000)
    #[arg(short, long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
    /// Path to Claude config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Enable desktop notifications on status changes
    #[arg(short, long)]
    pub notify: bool,
    /// Save results to history file
    #[arg(short = 'H', long)]
    pub history: bool,
}

/// Flags merged over settings merged over defaults.
#[derive(Debug, Clone, PartialEq)]
struct CheckPlan {
    tool: String,
    timeout: Duration,
    interval: Duration,
    only_on_failure: bool,
}

impl CheckPlan {
    fn resolve(args: &CheckArgs, settings: &Settings) -> Self {
        let timeout_ms = args
            .timeout
            .or(settings.timeout_ms)
            .unwrap_or(PER_SERVER_TIMEOUT_MS)
            .max(1);
        let interval_secs = args
            .interval
            .or(settings.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS)
            .max(1);
        Self {
            tool: settings.tool.clone().unwrap_or_else(|| DEFAULT_TOOL.to_string()),
            timeout: Duration::from_millis(timeout_ms),
            interval: Duration::from_secs(interval_secs),
            only_on_failure: settings.only_on_failure.unwrap_or(false),
        }
    }
}

pub async fn run(args: CheckArgs, settings: &Settings) -> anyhow::Result<ExitCode> {
    let plan = CheckPlan::resolve(&args, settings);
    let opts = args.output.format_options();
    let checker = HealthChecker::new(ProbeTool::new(plan.tool.clone())).with_timeout(plan.timeout);
    let history = if args.history {
        match history_store(settings) {
            Ok(store) => Some(store),
            Err(e) => {
                report_history_error(&e, &opts);
                return Ok(ExitCode::FAILURE);
            }
        }
    } else {
        None
    };

    if !args.watch {
        let outcome = run_once(&checker, args.config.as_deref(), history.as_ref(), &opts).await;
        return Ok(outcome.exit_code());
    }

    let notifier = Notifier::desktop(NotificationOptions {
        enabled: args.notify,
        only_on_failure: plan.only_on_failure,
    });
    let mut watch = Watch {
        checker,
        config: args.config,
        history,
        notifier,
        opts,
        interval: plan.interval,
    };
    watch.run().await;
    Ok(ExitCode::SUCCESS)
}

/// How a single-shot check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    AllConnected,
    SomeFailed,
    /// Nothing was rendered; the error was reported instead.
    Fatal,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::AllConnected => ExitCode::SUCCESS,
            Outcome::SomeFailed | Outcome::Fatal => ExitCode::FAILURE,
        }
    }
}

async fn run_once(
    checker: &HealthChecker,
    config: Option<&Path>,
    history: Option<&HistoryStore>,
    opts: &FormatOptions,
) -> Outcome {
    let result = match checker.check_configured(config).await {
        Ok(result) => result,
        Err(e) => {
            report_check_error(&e, opts);
            return Outcome::Fatal;
        }
    };

    if let Some(store) = history {
        if let Err(e) = store.append(&result) {
            warn!(path = %store.path().display(), error = %e, "history append failed");
            report_history_error(&e, opts);
            return Outcome::Fatal;
        }
    }

    println!("{}", format_health_result(&result, opts));

    if result.all_connected() {
        Outcome::AllConnected
    } else {
        Outcome::SomeFailed
    }
}

struct Watch {
    checker: HealthChecker,
    config: Option<PathBuf>,
    history: Option<HistoryStore>,
    notifier: Notifier,
    opts: FormatOptions,
    interval: Duration,
}

impl Watch {
    /// Refresh until Ctrl-C. A cycle always finishes before the next
    /// tick is awaited.
    async fn run(&mut self) {
        let secs = self.interval.as_secs();
        if !self.opts.is_json() {
            println!(
                "{}",
                self.opts.paint(&format!("Watching MCP servers (refresh: {secs}s){}", self.features()), CYAN)
            );
            println!("{}\n", self.opts.paint("Press Ctrl+C to stop", CYAN));
        }
        info!(interval_secs = secs, notify = self.notifier.is_enabled(), "watch mode started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.cycle() => {}
            }
        }
        info!("watch mode stopped");
    }

    async fn cycle(&mut self) {
        let result = match self.checker.check_configured(self.config.as_deref()).await {
            Ok(result) => result,
            Err(e) => {
                report_check_error(&e, &self.opts);
                return;
            }
        };

        self.notifier.observe(&result);

        if let Some(store) = &self.history {
            if let Err(e) = store.append(&result) {
                warn!(path = %store.path().display(), error = %e, "history append failed");
                report(&format!("Failed to save history: {e}"), Some(e.code()), &self.opts);
            }
        }

        if !self.opts.is_json() {
            print!("\x1Bc");
            println!(
                "{}\n",
                self.opts.paint(
                    &format!(
                        "MCP Health Monitor (refreshing every {}s){}",
                        self.interval.as_secs(),
                        self.features()
                    ),
                    CYAN
                )
            );
        }
        println!("{}", format_health_result(&result, &self.opts));
    }

    fn features(&self) -> String {
        let mut features = Vec::new();
        if self.notifier.is_enabled() {
            features.push("notifications");
        }
        if self.history.is_some() {
            features.push("history");
        }
        if features.is_empty() {
            String::new()
        } else {
            format!(" [{}]", features.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_defaults() {
        let plan = CheckPlan::resolve(&CheckArgs::default(), &Settings::default());
        assert_eq!(plan.tool, "claude");
        assert_eq!(plan.timeout, Duration::from_millis(3000));
        assert_eq!(plan.interval, Duration::from_secs(30));
        assert!(!plan.only_on_failure);
    }

    #[test]
    fn settings_override_defaults() {
        let settings = Settings {
            tool: Some("/opt/claude".to_string()),
            timeout_ms: Some(1500),
            interval_secs: Some(10),
            only_on_failure: Some(true),
            ..Settings::default()
        };
        let plan = CheckPlan::resolve(&CheckArgs::default(), &settings);
        assert_eq!(plan.tool, "/opt/claude");
        assert_eq!(plan.timeout, Duration::from_millis(1500));
        assert_eq!(plan.interval, Duration::from_secs(10));
        assert!(plan.only_on_failure);
    }

    #[test]
    fn flags_override_settings() {
        let settings = Settings {
            timeout_ms: Some(1500),
            interval_secs: Some(10),
            ..Settings::default()
        };
        let args = CheckArgs {
            timeout: Some(500),
            interval: Some(5),
            ..CheckArgs::default()
        };
        let plan = CheckPlan::resolve(&args, &settings);
        assert_eq!(plan.timeout, Duration::from_millis(500));
        assert_eq!(plan.interval, Duration::from_secs(5));
    }

    #[test]
    fn zero_interval_from_settings_is_clamped() {
        let settings = Settings {
            interval_secs: Some(0),
            ..Settings::default()
        };
        let plan = CheckPlan::resolve(&CheckArgs::default(), &settings);
        assert_eq!(plan.interval, Duration::from_secs(1));
    }

    // `true` passes the `--version` preflight and reports every server
    // as not connected.
    #[cfg(unix)]
    fn checker() -> HealthChecker {
        HealthChecker::new(ProbeTool::new("true")).with_timeout(Duration::from_secs(2))
    }

    #[cfg(unix)]
    fn config_in(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("claude.json");
        std::fs::write(&path, r#"{ "mcpServers": { "svc": { "command": "node" } } }"#).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unwritable_history_is_reported_not_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = HistoryStore::new(blocker.join("history.json"));
        let json = FormatOptions::resolve(true, false, false);

        let outcome = run_once(&checker(), Some(&config), Some(&store), &json).await;

        assert_eq!(outcome, Outcome::Fatal);
        assert!(blocker.is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_servers_are_recorded_and_exit_non_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let store = HistoryStore::new(dir.path().join("history.json"));
        let json = FormatOptions::resolve(true, false, false);

        let outcome = run_once(&checker(), Some(&config), Some(&store), &json).await;

        assert_eq!(outcome, Outcome::SomeFailed);
        assert_eq!(store.load().entries.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn config_error_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let json = FormatOptions::resolve(true, false, false);

        let outcome = run_once(&checker(), Some(&dir.path().join("missing.json")), None, &json).await;
        assert_eq!(outcome, Outcome::Fatal);
    }
}
