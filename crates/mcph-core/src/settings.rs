//! `config.toml` settings for the monitor itself.
//!
//! Every key is optional; command-line flags take precedence over
//! anything set here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under `$HOME` holding settings and history.
pub const STATE_DIR: &str = ".mcp-health";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Executable used for the preflight check and every probe.
    pub tool: Option<String>,
    /// Per-probe deadline in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Watch-mode refresh interval in seconds.
    pub interval_secs: Option<u64>,
    /// History log location.
    pub history_path: Option<PathBuf>,
    /// Only alert when a server goes down.
    pub only_on_failure: Option<bool>,
}

impl Settings {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load from `path` if given, else from the default location.
    ///
    /// A missing default file yields defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(STATE_DIR).join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full() {
        let toml_str = r#"
tool = "/opt/bin/claude"
timeout_ms = 1500
interval_secs = 10
history_path = "/tmp/history.json"
only_on_failure = true
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.tool.as_deref(), Some("/opt/bin/claude"));
        assert_eq!(settings.timeout_ms, Some(1500));
        assert_eq!(settings.interval_secs, Some(10));
        assert_eq!(settings.history_path, Some(PathBuf::from("/tmp/history.json")));
        assert_eq!(settings.only_on_failure, Some(true));
    }

    #[test]
    fn parse_empty_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(toml::from_str::<Settings>("colour = true").is_err());
    }

    #[test]
    fn explicit_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_ms = 750\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.timeout_ms, Some(750));
        assert!(settings.tool.is_none());
    }
}
