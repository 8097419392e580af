//! Dev environment smoke test
//!
//! Runs a checklist of independent environment probes and reports an
//! aggregate pass/fail status.

/// Build-time information (timestamp, target, rustc)
pub mod build_info;

/// Smoke test configuration
pub mod config;

/// Checklist runner, checks, probes and reporting
pub mod smoke;
