//! Shared types for rdstail
//!
//! This crate contains data structures used across multiple rdstail crates.

use std::fmt;

// ============================================================================
// RDS Resource Types
// ============================================================================

/// Database engine family, which decides the log timestamp grammar
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Engine {
    MySql,
    MariaDb,
    Postgres,
    /// Any engine we have no timestamp grammar for (keeps the raw name)
    Unsupported(String),
}

impl From<&str> for Engine {
    fn from(s: &str) -> Self {
        match s {
            "mysql" => Self::MySql,
            "mariadb" => Self::MariaDb,
            "postgres" => Self::Postgres,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl Engine {
    /// Engine name as reported by RDS
    pub fn as_str(&self) -> &str {
        match self {
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::Postgres => "postgres",
            Self::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log file available on a DB instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFileInfo {
    pub name: String,

    /// Last write time in epoch milliseconds
    pub last_written: i64,
}

impl LogFileInfo {
    pub fn new(name: impl Into<String>, last_written: i64) -> Self {
        Self {
            name: name.into(),
            last_written,
        }
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// One chunk returned by a log portion download
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogPortion {
    /// Raw text, possibly absent
    pub data: Option<String>,

    /// Marker to present on the next request for this file
    pub marker: Option<String>,

    /// Whether the service has more data past this chunk
    pub pending: bool,
}

impl LogPortion {
    pub fn new(data: Option<&str>, marker: Option<&str>, pending: bool) -> Self {
        Self {
            data: data.map(str::to_string),
            marker: marker.map(str::to_string),
            pending,
        }
    }

    /// Non-blank lines of this chunk, in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.data
            .as_deref()
            .unwrap_or_default()
            .split('\n')
            .filter(|line| !line.trim().is_empty())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while tailing
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    #[error("--instance is required")]
    MissingInstance,

    #[error(
        "Invalid format '{0}'. Use RFC3339 (2006-01-02T15:04:05Z), timestamp (2006-01-02 15:04:05) or duration (1h, 5m)"
    )]
    InvalidSince(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unable to load SDK config: {0}")]
    Credentials(String),

    #[error("DB instance not found: {0}")]
    InstanceNotFound(String),

    #[error("failed to describe DB instance: {0}")]
    Lookup(String),

    #[error("Failed to describe log files: {0}")]
    List(String),

    #[error("Failed to download log portion: {0}")]
    Fetch(String),

    #[error("Failed to write log output: {0}")]
    Output(#[from] std::io::Error),
}

impl TailError {
    /// Whether this error must abort the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Fetch(_))
    }
}

/// Why a log line carried no usable timestamp
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),

    #[error("invalid timestamp: {0}")]
    Malformed(#[from] chrono::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_str() {
        assert_eq!(Engine::from("mysql"), Engine::MySql);
        assert_eq!(Engine::from("mariadb"), Engine::MariaDb);
        assert_eq!(Engine::from("postgres"), Engine::Postgres);
        assert_eq!(
            Engine::from("aurora-postgresql"),
            Engine::Unsupported("aurora-postgresql".to_string())
        );
        assert_eq!(Engine::from("sqlserver-ex").to_string(), "sqlserver-ex");
    }

    #[test]
    fn test_portion_lines_skip_blank() {
        let portion = LogPortion::new(Some("first\n\n   \nsecond\n"), Some("1:10"), false);
        let lines: Vec<_> = portion.lines().collect();
        assert_eq!(lines, vec!["first", "second"]);

        let empty = LogPortion::new(None, Some("1:10"), true);
        assert_eq!(empty.lines().count(), 0);
    }

    #[test]
    fn test_only_fetch_is_non_fatal() {
        assert!(!TailError::Fetch("timeout".into()).is_fatal());
        assert!(TailError::List("denied".into()).is_fatal());
        assert!(TailError::InstanceNotFound("db".into()).is_fatal());
        assert!(TailError::MissingInstance.is_fatal());
    }
}
