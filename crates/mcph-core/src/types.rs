//! Domain types shared across mcp-health crates.
//!
//! A cycle starts from an ordered list of [`ServerConfig`]s, produces one
//! [`HealthStatus`] per server, and aggregates them into a
//! [`HealthCheckResult`]. All types serialize to camelCase JSON.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Configuration ─────────────────────────────────────────────────

/// Transport a configured server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerKind {
    #[default]
    Stdio,
    #[serde(alias = "sse")]
    Stream,
    Http,
}

impl ServerKind {
    /// Normalize a raw `type` string from a config file.
    ///
    /// Unknown or missing values fall back to `Stdio`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("sse") | Some("stream") => ServerKind::Stream,
            Some("http") => ServerKind::Http,
            _ => ServerKind::Stdio,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServerKind::Stdio => "stdio",
            ServerKind::Stream => "stream",
            ServerKind::Http => "http",
        }
    }
}

/// One configured server, keyed by its unique name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub name: String,
    pub kind: ServerKind,
    pub command: String,
    pub args: Vec<String>,
    pub env: Option<HashMap<String, String>>,
}

impl ServerConfig {
    /// Minimal stdio config with no args or env.
    pub fn stdio(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ServerKind::Stdio,
            command: command.to_string(),
            args: Vec::new(),
            env: None,
        }
    }
}

// ── Health ────────────────────────────────────────────────────────

/// Outcome of probing one server in one cycle.
///
/// `latency_ms` is set only on success and `error_message` only on
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub name: String,
    pub is_connected: bool,
    pub latency_ms: Option<u64>,
    pub checked_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

impl HealthStatus {
    /// A reachable server with its measured latency.
    pub fn connected(name: &str, latency_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            is_connected: true,
            latency_ms: Some(latency_ms),
            checked_at: Utc::now(),
            error_message: None,
        }
    }

    /// An unreachable server. Latency is dropped by convention.
    pub fn failed(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            is_connected: false,
            latency_ms: None,
            checked_at: Utc::now(),
            error_message: Some(message.into()),
        }
    }
}

/// Aggregate of one full cycle across every configured server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    /// One status per server, in configuration order.
    pub servers: Vec<HealthStatus>,
    pub total_time_ms: u64,
    pub checked_at: DateTime<Utc>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl HealthCheckResult {
    /// Build a result from per-server statuses, stamping `checked_at` now.
    pub fn from_statuses(servers: Vec<HealthStatus>, elapsed: Duration) -> Self {
        let success_count = servers.iter().filter(|s| s.is_connected).count();
        let failure_count = servers.len() - success_count;
        Self {
            servers,
            total_time_ms: elapsed.as_millis() as u64,
            checked_at: Utc::now(),
            success_count,
            failure_count,
        }
    }

    pub fn all_connected(&self) -> bool {
        self.failure_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_normalization() {
        assert_eq!(ServerKind::from_raw(Some("sse")), ServerKind::Stream);
        assert_eq!(ServerKind::from_raw(Some("stream")), ServerKind::Stream);
        assert_eq!(ServerKind::from_raw(Some("http")), ServerKind::Http);
        assert_eq!(ServerKind::from_raw(Some("stdio")), ServerKind::Stdio);
        assert_eq!(ServerKind::from_raw(Some("websocket")), ServerKind::Stdio);
        assert_eq!(ServerKind::from_raw(None), ServerKind::Stdio);
    }

    #[test]
    fn status_constructors_keep_latency_and_error_exclusive() {
        let up = HealthStatus::connected("a", 42);
        assert!(up.is_connected);
        assert_eq!(up.latency_ms, Some(42));
        assert!(up.error_message.is_none());

        let down = HealthStatus::failed("b", "boom");
        assert!(!down.is_connected);
        assert!(down.latency_ms.is_none());
        assert_eq!(down.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn result_counts_sum_to_server_count() {
        let result = HealthCheckResult::from_statuses(
            vec![
                HealthStatus::connected("a", 10),
                HealthStatus::failed("b", "down"),
                HealthStatus::failed("c", "down"),
            ],
            Duration::from_millis(1500),
        );
        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 2);
        assert_eq!(result.success_count + result.failure_count, result.servers.len());
        assert_eq!(result.total_time_ms, 1500);
        assert!(!result.all_connected());
    }

    #[test]
    fn empty_result_is_all_connected() {
        let result = HealthCheckResult::from_statuses(Vec::new(), Duration::ZERO);
        assert_eq!(result.success_count, 0);
        assert_eq!(result.failure_count, 0);
        assert!(result.all_connected());
    }

    #[test]
    fn status_serializes_camel_case() {
        let json = serde_json::to_value(HealthStatus::failed("x", "nope")).unwrap();
        assert_eq!(json["isConnected"], false);
        assert!(json["latencyMs"].is_null());
        assert_eq!(json["errorMessage"], "nope");
    }
}
