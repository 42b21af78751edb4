//! mcph-health — health checking for configured MCP servers.
//!
//! Each server is probed by running the external CLI (`claude mcp get
//! <name>`) under a hard deadline. The engine verifies the CLI is present,
//! fans out one probe task per server, and joins them so that no single
//! probe can abort or mask the others.
//!
//! # Architecture
//!
//! ```text
//! HealthChecker::run_check(servers)
//!   ├── verify_tool()            `<tool> --version`, gates the cycle
//!   ├── one task per server
//!   │   └── probe_server()       spawn / wait / kill on deadline
//!   └── join all tasks            panics become failed statuses
//!         → HealthCheckResult    statuses in configuration order
//! ```
//!
//! Per-server problems (timeout, spawn failure, negative output) always
//! end up as a failed [`HealthStatus`](mcph_core::HealthStatus). Only a
//! missing CLI is fatal.

pub mod checker;
pub mod engine;

pub use checker::{probe_server, ProbeError, ProbeTool, DEFAULT_TOOL, PER_SERVER_TIMEOUT_MS};
pub use engine::HealthChecker;
