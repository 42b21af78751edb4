//! Persisted history types and the uptime aggregation over them.
//!
//! Field names are camelCase on disk so existing history files keep
//! loading.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use mcph_core::{HealthCheckResult, HealthStatus};

/// Current on-disk format version.
pub const HISTORY_VERSION: u32 = 1;

/// One server's outcome inside a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSnapshot {
    pub name: String,
    pub is_connected: bool,
    pub latency_ms: Option<u64>,
}

impl From<&HealthStatus> for ServerSnapshot {
    fn from(status: &HealthStatus) -> Self {
        Self {
            name: status.name.clone(),
            is_connected: status.is_connected,
            latency_ms: status.latency_ms,
        }
    }
}

/// One completed check cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub servers: Vec<ServerSnapshot>,
}

impl From<&HealthCheckResult> for HistoryEntry {
    fn from(result: &HealthCheckResult) -> Self {
        Self {
            timestamp: result.checked_at,
            servers: result.servers.iter().map(ServerSnapshot::from).collect(),
        }
    }
}

/// The whole history document, oldest entry first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    pub version: u32,
    pub entries: Vec<HistoryEntry>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self {
            version: HISTORY_VERSION,
            entries: Vec::new(),
        }
    }
}

/// Availability summary for one server over the retained window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeStats {
    pub server_name: String,
    pub total_checks: u64,
    pub successful_checks: u64,
    pub uptime_percentage: f64,
    /// Rounded mean over successful checks that recorded a latency.
    pub average_latency_ms: Option<u64>,
    /// Status in the most recent entry that mentions this server.
    pub last_status: bool,
    pub last_checked: DateTime<Utc>,
}

#[derive(Default)]
struct Tally {
    total: u64,
    successful: u64,
    latencies: Vec<u64>,
    last: Option<(bool, DateTime<Utc>)>,
}

impl HistoryLog {
    /// Append a snapshot and drop the oldest entries beyond `max_entries`.
    pub fn push_bounded(&mut self, entry: HistoryEntry, max_entries: usize) {
        self.entries.push(entry);
        if self.entries.len() > max_entries {
            let excess = self.entries.len() - max_entries;
            self.entries.drain(..excess);
        }
    }

    /// Per-server uptime over every entry, in first-seen order.
    pub fn uptime_stats(&self) -> Vec<UptimeStats> {
        let mut tallies: IndexMap<&str, Tally> = IndexMap::new();

        for entry in &self.entries {
            for server in &entry.servers {
                let tally = tallies.entry(server.name.as_str()).or_default();
                tally.total += 1;
                if server.is_connected {
                    tally.successful += 1;
                    if let Some(latency) = server.latency_ms {
                        tally.latencies.push(latency);
                    }
                }
                tally.last = Some((server.is_connected, entry.timestamp));
            }
        }

        tallies
            .into_iter()
            .filter_map(|(name, tally)| {
                let (last_status, last_checked) = tally.last?;
                Some(UptimeStats {
                    server_name: name.to_string(),
                    total_checks: tally.total,
                    successful_checks: tally.successful,
                    uptime_percentage: tally.successful as f64 / tally.total as f64 * 100.0,
                    average_latency_ms: rounded_mean(&tally.latencies),
                    last_status,
                    last_checked,
                })
            })
            .collect()
    }
}

fn rounded_mean(values: &[u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    let sum: u64 = values.iter().sum();
    Some((sum as f64 / values.len() as f64).round() as u64)
}
