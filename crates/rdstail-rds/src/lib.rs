//! RDS client for rdstail
//!
//! This crate provides the RDS API integration for detecting the instance
//! engine, listing log files, and downloading log file portions.

mod client;
mod source;

pub use client::RdsClient;
pub use source::LogSource;

// Re-export types that are used in our public API
pub use rdstail_types::{Engine, LogFileInfo, LogPortion, TailError};
