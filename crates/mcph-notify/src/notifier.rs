//! The long-lived context the watch loop feeds each cycle into.

use std::collections::HashMap;

use tracing::debug;

use mcph_core::HealthCheckResult;

use crate::alert::{Alert, AlertSink, DesktopAlert};
use crate::tracker::{ServerState, TransitionEvent, TransitionTracker};

/// User-facing notification switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationOptions {
    pub enabled: bool,
    /// Dispatch only "went down" alerts. Tracking is unaffected.
    pub only_on_failure: bool,
}

/// Transition tracking plus alert dispatch.
pub struct Notifier {
    options: NotificationOptions,
    tracker: TransitionTracker,
    sink: Box<dyn AlertSink>,
}

impl Notifier {
    pub fn new(options: NotificationOptions, sink: Box<dyn AlertSink>) -> Self {
        Self {
            options,
            tracker: TransitionTracker::new(),
            sink,
        }
    }

    /// Notifier that raises native desktop notifications.
    pub fn desktop(options: NotificationOptions) -> Self {
        Self::new(options, Box::new(DesktopAlert))
    }

    /// Fold one cycle into the tracked state and dispatch alerts for the
    /// flips. Does nothing while disabled.
    pub fn observe(&mut self, result: &HealthCheckResult) -> Vec<TransitionEvent> {
        if !self.options.enabled {
            return Vec::new();
        }

        let events = self.tracker.observe(result);
        for event in &events {
            if self.options.only_on_failure && event.went_up {
                continue;
            }
            let alert = Alert::from(event);
            if let Err(e) = self.sink.send(&alert) {
                debug!(server = %event.server_name, error = %e, "alert dispatch failed");
            }
        }
        events
    }

    pub fn options(&self) -> NotificationOptions {
        self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Toggle notifications. Tracked state survives the toggle.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.options.enabled = enabled;
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    pub fn state(&self, name: &str) -> ServerState {
        self.tracker.state(name)
    }

    pub fn tracked(&self) -> &HashMap<String, bool> {
        self.tracker.tracked()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("options", &self.options)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}
