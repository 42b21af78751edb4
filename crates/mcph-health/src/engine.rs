//! Health check engine: preflight, fan-out, settle-all join.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use mcph_core::{read_server_configs, HealthCheckError, HealthCheckResult, HealthResult, HealthStatus, ServerConfig};

use crate::checker::{probe_server, ProbeError, ProbeTool, PER_SERVER_TIMEOUT_MS};

/// Upper bound on the `--version` preflight.
const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs health check cycles against a fixed probing tool.
#[derive(Debug, Clone)]
pub struct HealthChecker {
    tool: Arc<ProbeTool>,
    /// Deadline applied to each probe independently.
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(tool: ProbeTool) -> Self {
        Self {
            tool: Arc::new(tool),
            timeout: Duration::from_millis(PER_SERVER_TIMEOUT_MS),
        }
    }

    /// Override the per-probe deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn tool(&self) -> &ProbeTool {
        &self.tool
    }

    /// Check that the probing tool can be invoked at all.
    pub async fn verify_tool(&self) -> HealthResult<()> {
        let unavailable = || HealthCheckError::ToolUnavailable {
            tool: self.tool.program().to_string(),
        };

        let status = tokio::time::timeout(PREFLIGHT_TIMEOUT, self.tool.version_command().status())
            .await
            .map_err(|_| unavailable())?
            .map_err(|e| {
                debug!(tool = %self.tool.program(), error = %e, "preflight spawn failed");
                unavailable()
            })?;

        if !status.success() {
            debug!(tool = %self.tool.program(), ?status, "preflight exited non-zero");
            return Err(unavailable());
        }
        Ok(())
    }

    /// Run one full cycle over `servers`.
    ///
    /// Fails only when the probing tool is unavailable; individual probe
    /// failures are reported inside the result.
    pub async fn run_check(&self, servers: &[ServerConfig]) -> HealthResult<HealthCheckResult> {
        let started = Instant::now();

        self.verify_tool().await?;
        debug!(tool = %self.tool.program(), "preflight passed");

        let statuses = self.probe_all(servers).await;
        let result = HealthCheckResult::from_statuses(statuses, started.elapsed());

        info!(
            servers = result.servers.len(),
            connected = result.success_count,
            failed = result.failure_count,
            total_time_ms = result.total_time_ms,
            "health check cycle complete"
        );
        Ok(result)
    }

    /// Read the server config (explicit path or defaults) and run a cycle.
    pub async fn check_configured(&self, config_path: Option<&Path>) -> HealthResult<HealthCheckResult> {
        let servers = read_server_configs(config_path)?;
        self.run_check(&servers).await
    }

    async fn probe_all(&self, servers: &[ServerConfig]) -> Vec<HealthStatus> {
        let tool = Arc::clone(&self.tool);
        let timeout = self.timeout;
        settle_all(servers, move |server| {
            let tool = Arc::clone(&tool);
            async move { probe_server(&tool, &server, timeout).await }
        })
        .await
    }
}

/// Run `probe` for every server concurrently and collect every outcome.
///
/// Output order matches `servers`, whatever order the probes finish in. A
/// probe task that panics or is cancelled becomes a failed status in its
/// own slot; the other probes are unaffected.
async fn settle_all<F, Fut>(servers: &[ServerConfig], probe: F) -> Vec<HealthStatus>
where
    F: Fn(ServerConfig) -> Fut,
    Fut: Future<Output = HealthStatus> + Send + 'static,
{
    let handles: Vec<_> = servers
        .iter()
        .cloned()
        .map(|server| tokio::spawn(probe(server)))
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .zip(servers)
        .map(|(joined, server)| match joined {
            Ok(status) => status,
            Err(e) => {
                warn!(server = %server.name, error = %e, "probe task died");
                HealthStatus::failed(&server.name, ProbeError::Aborted(join_error_message(e)).to_string())
            }
        })
        .collect()
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new(ProbeTool::default())
    }
}

/// Best-effort text for a task that panicked or was cancelled.
fn join_error_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "probe task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_per_server_constant() {
        let checker = HealthChecker::default();
        assert_eq!(checker.timeout(), Duration::from_millis(PER_SERVER_TIMEOUT_MS));
        assert_eq!(checker.tool().program(), "claude");
    }

    #[test]
    fn with_timeout_overrides() {
        let checker = HealthChecker::default().with_timeout(Duration::from_millis(250));
        assert_eq!(checker.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn missing_tool_fails_preflight() {
        let checker = HealthChecker::new(ProbeTool::new("mcph-definitely-not-installed-tool"));
        let err = checker.verify_tool().await.unwrap_err();
        assert_eq!(err.code(), "TOOL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn missing_tool_aborts_cycle() {
        let checker = HealthChecker::new(ProbeTool::new("mcph-definitely-not-installed-tool"));
        let servers = vec![ServerConfig::stdio("a", "a")];
        let err = checker.run_check(&servers).await.unwrap_err();
        assert!(matches!(err, HealthCheckError::ToolUnavailable { .. }));
    }

    async fn exploding_probe(name: &'static str) -> HealthStatus {
        panic!("probe for {name} exploded")
    }

    #[tokio::test]
    async fn panicked_task_message_is_recovered() {
        let err = tokio::spawn(exploding_probe("svc")).await.unwrap_err();
        assert!(err.is_panic());
        assert_eq!(join_error_message(err), "probe for svc exploded");
    }

    #[tokio::test]
    async fn panicking_check_keeps_its_slot() {
        let servers = vec![
            ServerConfig::stdio("first", "a"),
            ServerConfig::stdio("boom", "b"),
            ServerConfig::stdio("last", "c"),
        ];

        let statuses = settle_all(&servers, |server| async move {
            if server.name == "boom" {
                tokio::time::sleep(Duration::from_millis(10)).await;
                panic!("check for boom exploded");
            }
            HealthStatus::connected(&server.name, 5)
        })
        .await;

        let names: Vec<_> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["first", "boom", "last"]);
        assert!(statuses[0].is_connected);
        assert!(statuses[2].is_connected);

        let boom = &statuses[1];
        assert!(!boom.is_connected);
        assert!(boom.latency_ms.is_none());
        assert_eq!(boom.error_message.as_deref(), Some("check for boom exploded"));
    }

    #[tokio::test]
    async fn settle_all_on_empty_list() {
        let statuses = settle_all(&[], |server| async move { HealthStatus::connected(&server.name, 1) }).await;
        assert!(statuses.is_empty());
    }

    #[tokio::test]
    async fn cancelled_task_message_is_recovered() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            HealthStatus::connected("never", 0)
        });
        handle.abort();
        let err = handle.await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(!join_error_message(err).is_empty());
    }
}
