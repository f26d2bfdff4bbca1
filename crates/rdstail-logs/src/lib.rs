//! Log fetching for rdstail
//!
//! This crate provides timestamp parsing, `--since` resolution, marker
//! tracking, and the portion download / polling loop.

mod markers;
mod parser;
mod since;
mod tailer;

#[cfg(test)]
mod fake;

pub use markers::MarkerTable;
pub use parser::LogParser;
pub use since::{parse_duration, resolve_cutoff};
pub use tailer::{
    DEFAULT_MAX_PORTIONS, DEFAULT_POLL_INTERVAL, DrainOutcome, LineFilter, RoundSummary,
    TailOptions, Tailer, drain_file,
};

// Re-export types used in our public API
pub use rdstail_types::{Engine, LogFileInfo, LogPortion, TailError, TimestampError};
