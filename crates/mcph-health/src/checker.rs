//! Probe logic for a single server.
//!
//! A probe runs `<tool> mcp get <name>` and races it against a deadline.
//! Exactly one of {process exit, spawn error, deadline} decides the
//! outcome; on the deadline the child is killed and its output discarded.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use mcph_core::{HealthStatus, ServerConfig};

/// Default per-probe deadline.
pub const PER_SERVER_TIMEOUT_MS: u64 = 3000;

/// Executable probed when nothing else is configured.
pub const DEFAULT_TOOL: &str = "claude";

/// Why a probe did not report the server as connected.
///
/// Rendered into [`HealthStatus::error_message`]; never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },

    #[error("{0}")]
    Spawn(#[source] std::io::Error),

    #[error("{0}")]
    Wait(#[source] std::io::Error),

    /// The tool ran to completion but did not report a connection.
    #[error("{0}")]
    Rejected(String),

    /// The probe task itself died before producing a status.
    #[error("{0}")]
    Aborted(String),
}

/// The external CLI used to query server connectivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTool {
    program: String,
}

impl ProbeTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `<tool> --version`, used as the preflight check.
    pub(crate) fn version_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// `<tool> mcp get <name>` with both output streams captured.
    fn probe_command(&self, server_name: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["mcp", "get", server_name])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for ProbeTool {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

/// Probe one server, returning within `timeout` plus teardown cost.
///
/// Never fails: every outcome is folded into the returned status.
pub async fn probe_server(tool: &ProbeTool, server: &ServerConfig, timeout: Duration) -> HealthStatus {
    let started = Instant::now();
    let name = server.name.as_str();

    let mut child = match tool.probe_command(name).spawn() {
        Ok(child) => child,
        Err(e) => {
            debug!(server = %name, error = %e, "probe spawn failed");
            return HealthStatus::failed(name, ProbeError::Spawn(e).to_string());
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let outcome = tokio::time::timeout(timeout, async {
        tokio::join!(read_pipe(stdout), read_pipe(stderr), child.wait())
    })
    .await;

    match outcome {
        Ok((stdout, stderr, Ok(exit))) => {
            let latency_ms = started.elapsed().as_millis() as u64;
            if is_connected_output(&stdout) {
                debug!(server = %name, latency_ms, "probe connected");
                HealthStatus::connected(name, latency_ms)
            } else {
                debug!(server = %name, ?exit, "probe reported failure");
                HealthStatus::failed(name, ProbeError::Rejected(failure_message(&stderr)).to_string())
            }
        }
        Ok((_, _, Err(e))) => {
            debug!(server = %name, error = %e, "probe wait failed");
            HealthStatus::failed(name, ProbeError::Wait(e).to_string())
        }
        Err(_) => {
            let timeout_ms = timeout.as_millis() as u64;
            debug!(server = %name, timeout_ms, "probe timed out");
            if let Err(e) = child.kill().await {
                debug!(server = %name, error = %e, "failed to kill timed out probe");
            }
            HealthStatus::failed(name, ProbeError::TimedOut { timeout_ms }.to_string())
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            debug!(error = %e, "probe pipe read failed");
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Whether the tool's stdout reports a live connection.
pub(crate) fn is_connected_output(stdout: &str) -> bool {
    stdout.to_lowercase().contains("connected") || stdout.contains('✓')
}

/// Error text for a negative probe: trimmed stderr, or a generic message.
pub(crate) fn failure_message(stderr: &str) -> String {
    match stderr.trim() {
        "" => "Connection failed".to_string(),
        trimmed => trimmed.to_string(),
    }
}
