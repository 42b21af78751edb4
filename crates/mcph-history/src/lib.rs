//! mcph-history — durable check history and uptime statistics.
//!
//! Every completed cycle is appended to a single JSON document
//! (`{"version": 1, "entries": [...]}`) that stays human-readable and safe
//! to edit by hand. The log is bounded: once it exceeds
//! [`MAX_ENTRIES`] the oldest entries are dropped.
//!
//! # Architecture
//!
//! ```text
//! HistoryStore (path)
//!   ├── append(result)   load → push snapshot → keep newest N → rewrite
//!   ├── compute_stats()  full scan, per-server totals in first-seen order
//!   └── clear()          rewrite as an empty log
//! ```
//!
//! A missing or unparsable document reads as an empty log. Write failures
//! are returned to the caller.
//!
//! The store does no locking: callers must serialize access to one path.

pub mod error;
pub mod store;
pub mod types;

pub use error::{HistoryError, HistoryResult};
pub use store::{HistoryStore, MAX_ENTRIES};
pub use types::*;
