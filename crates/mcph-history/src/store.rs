//! JSON-file persistence for check history.
//!
//! Each write rewrites the whole document through a sibling temp file and
//! a rename. Reads treat a missing or corrupt document as an empty log.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use mcph_core::settings::STATE_DIR;
use mcph_core::HealthCheckResult;

use crate::error::{HistoryError, HistoryResult};
use crate::types::{HistoryEntry, HistoryLog, UptimeStats};

/// Default retention: entries beyond this are evicted oldest-first.
pub const MAX_ENTRIES: usize = 1000;

/// History log bound to one file path.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
}

impl HistoryStore {
    /// Use the log at `path`. Nothing touches the disk until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_entries: MAX_ENTRIES,
        }
    }

    /// Use the log at the default location (`~/.mcp-health/history.json`).
    pub fn open_default() -> HistoryResult<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> HistoryResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(STATE_DIR).join("history.json"))
            .ok_or(HistoryError::NoHomeDir)
    }

    /// Override the retention bound (for testing).
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current log. Never fails.
    pub fn load(&self) -> HistoryLog {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HistoryLog::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "history unreadable, starting empty");
                return HistoryLog::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(log) => log,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "history corrupt, starting empty");
                HistoryLog::default()
            }
        }
    }

    /// Record one completed cycle.
    pub fn append(&self, result: &HealthCheckResult) -> HistoryResult<()> {
        let mut log = self.load();
        log.push_bounded(HistoryEntry::from(result), self.max_entries);
        self.save(&log)?;
        debug!(path = %self.path.display(), entries = log.entries.len(), "history entry appended");
        Ok(())
    }

    /// Uptime statistics over the whole retained log.
    pub fn compute_stats(&self) -> Vec<UptimeStats> {
        self.load().uptime_stats()
    }

    /// Replace the log with an empty one.
    pub fn clear(&self) -> HistoryResult<()> {
        self.save(&HistoryLog::default())?;
        debug!(path = %self.path.display(), "history cleared");
        Ok(())
    }

    fn save(&self, log: &HistoryLog) -> HistoryResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| HistoryError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let body = serde_json::to_string_pretty(log)?;
        let tmp = self.tmp_path();
        let write_error = |source| HistoryError::Write {
            path: self.path.clone(),
            source,
        };
        std::fs::write(&tmp, body).map_err(write_error)?;
        std::fs::rename(&tmp, &self.path).map_err(write_error)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
