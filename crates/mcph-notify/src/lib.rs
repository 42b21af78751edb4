//! mcph-notify — up/down transition detection with desktop alerts.
//!
//! A [`Notifier`] remembers the last observed connectivity of every server
//! and, on each cycle, reports the servers whose state flipped. The first
//! observation of a server only establishes its baseline.
//!
//! # Architecture
//!
//! ```text
//! Notifier (one per monitor, outlives cycles)
//!   ├── TransitionTracker   name → last isConnected
//!   │     Unknown ─observe→ Up ⇄ Down
//!   └── AlertSink           DesktopAlert (osascript / PowerShell / notify-send)
//! ```
//!
//! Alert delivery is best effort: a failing sink is logged and ignored and
//! never changes tracked state.

pub mod alert;
pub mod notifier;
pub mod tracker;

pub use alert::{Alert, AlertSink, DesktopAlert};
pub use notifier::{NotificationOptions, Notifier};
pub use tracker::{ServerState, TransitionEvent, TransitionTracker};
