//! Server configuration reader.
//!
//! Extracts the `mcpServers` map from a Claude config file. Server order
//! follows the order of keys in the document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{HealthCheckError, HealthResult};
use crate::types::{ServerConfig, ServerKind};

/// Top-level shape of a Claude config file. Unrelated keys are ignored.
///
/// Entries stay as raw JSON so one odd entry cannot reject the file.
#[derive(Debug, Default, Deserialize)]
struct ClaudeConfigFile {
    #[serde(rename = "mcpServers")]
    mcp_servers: Option<IndexMap<String, Value>>,
}

/// Build a server from its on-disk entry, taking each field only when it
/// has the expected shape.
fn server_from_entry(name: String, entry: &Value) -> ServerConfig {
    let kind = entry.get("type").and_then(Value::as_str);
    let command = entry
        .get("command")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let args = entry
        .get("args")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();
    let env = entry.get("env").and_then(Value::as_object).map(|vars| {
        vars.iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
            .collect::<HashMap<_, _>>()
    });

    ServerConfig {
        name,
        kind: ServerKind::from_raw(kind),
        command,
        args,
        env,
    }
}

/// Config files searched when no explicit path is given, in priority order.
pub fn default_config_paths() -> Vec<PathBuf> {
    let home = dirs::home_dir().unwrap_or_default();
    vec![
        home.join(".claude.json"),
        home.join(".claude").join("settings.json"),
    ]
}

/// Read the ordered server list from `path`, or from the first existing
/// default location.
pub fn read_server_configs(path: Option<&Path>) -> HealthResult<Vec<ServerConfig>> {
    let candidates = match path {
        Some(p) => vec![p.to_path_buf()],
        None => default_config_paths(),
    };

    let Some(found) = candidates.iter().find(|p| p.exists()) else {
        let searched = candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(HealthCheckError::ConfigRead {
            path: searched,
            reason: "No config file found".to_string(),
        });
    };

    let servers = parse_config_file(found)?;
    if servers.is_empty() {
        return Err(HealthCheckError::NoServersConfigured);
    }

    debug!(path = %found.display(), count = servers.len(), "server configs loaded");
    Ok(servers)
}

fn parse_config_file(path: &Path) -> HealthResult<Vec<ServerConfig>> {
    let read_error = |reason: String| HealthCheckError::ConfigRead {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| read_error(e.to_string()))?;
    let file: ClaudeConfigFile =
        serde_json::from_str(&content).map_err(|e| read_error(e.to_string()))?;

    Ok(file
        .mcp_servers
        .unwrap_or_default()
        .into_iter()
        .map(|(name, entry)| server_from_entry(name, &entry))
        .collect())
}
