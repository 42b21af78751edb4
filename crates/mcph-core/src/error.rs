//! Fatal, cycle-level errors.
//!
//! Per-server failures never show up here; they are embedded in
//! [`HealthStatus`](crate::HealthStatus) instead.

use thiserror::Error;

/// Result type alias for cycle-level operations.
pub type HealthResult<T> = Result<T, HealthCheckError>;

/// Errors that abort a whole health check cycle.
#[derive(Debug, Error)]
pub enum HealthCheckError {
    #[error(
        "{tool} CLI not found. Please install it with: npm install -g @anthropic-ai/claude-code"
    )]
    ToolUnavailable { tool: String },

    #[error("Failed to read config at {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    #[error("No MCP servers configured. Add servers with: claude mcp add <name> -- <command>")]
    NoServersConfigured,
}

impl HealthCheckError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            HealthCheckError::ToolUnavailable { .. } => "TOOL_UNAVAILABLE",
            HealthCheckError::ConfigRead { .. } => "CONFIG_READ_ERROR",
            HealthCheckError::NoServersConfigured => "NO_SERVERS_CONFIGURED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_unavailable_message_and_code() {
        let err = HealthCheckError::ToolUnavailable {
            tool: "claude".to_string(),
        };
        assert!(err.to_string().contains("claude CLI not found"));
        assert!(err.to_string().contains("npm install"));
        assert_eq!(err.code(), "TOOL_UNAVAILABLE");
    }

    #[test]
    fn config_read_includes_path_and_reason() {
        let err = HealthCheckError::ConfigRead {
            path: "/path/to/config.json".to_string(),
            reason: "Permission denied".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/path/to/config.json"));
        assert!(msg.contains("Permission denied"));
        assert_eq!(err.code(), "CONFIG_READ_ERROR");
    }

    #[test]
    fn no_servers_code() {
        let err = HealthCheckError::NoServersConfigured;
        assert!(err.to_string().contains("claude mcp add"));
        assert_eq!(err.code(), "NO_SERVERS_CONFIGURED");
    }
}
