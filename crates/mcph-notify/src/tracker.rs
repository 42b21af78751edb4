//! Per-server up/down state machine.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use mcph_core::HealthCheckResult;

/// Last known state of one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    /// Never observed, or observed only before a reset.
    Unknown,
    Up,
    Down,
}

impl From<bool> for ServerState {
    fn from(is_connected: bool) -> Self {
        if is_connected {
            ServerState::Up
        } else {
            ServerState::Down
        }
    }
}

/// A server flipped between up and down across two observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEvent {
    pub server_name: String,
    /// `true` for down → up, `false` for up → down.
    pub went_up: bool,
    /// Error text of the observation that caused the flip.
    pub error_message: Option<String>,
}

/// Remembers the last observed connectivity per server name.
#[derive(Debug, Default)]
pub struct TransitionTracker {
    states: HashMap<String, bool>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one cycle into the tracked state and return the flips, in
    /// result order.
    pub fn observe(&mut self, result: &HealthCheckResult) -> Vec<TransitionEvent> {
        let mut events = Vec::new();

        for server in &result.servers {
            let previous = self.states.insert(server.name.clone(), server.is_connected);
            if previous.is_some_and(|was| was != server.is_connected) {
                info!(
                    server = %server.name,
                    went_up = server.is_connected,
                    "server state changed"
                );
                events.push(TransitionEvent {
                    server_name: server.name.clone(),
                    went_up: server.is_connected,
                    error_message: server.error_message.clone(),
                });
            }
        }

        events
    }

    pub fn state(&self, name: &str) -> ServerState {
        self.states
            .get(name)
            .map_or(ServerState::Unknown, |&up| ServerState::from(up))
    }

    /// Read-only view of every tracked server.
    pub fn tracked(&self) -> &HashMap<String, bool> {
        &self.states
    }

    /// Forget every server; the next observation is a baseline again.
    pub fn reset(&mut self) {
        self.states.clear();
    }
}
