use chrono::{DateTime, NaiveDateTime, Utc};

use rdstail_types::{Engine, TimestampError};

/// MySQL/MariaDB error log prefix: 2024-01-15T10:30:00.123456Z
const MYSQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// PostgreSQL log_line_prefix default on RDS: 2024-01-15 10:30:00 UTC:...
const POSTGRES_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log parser for extracting timestamps from raw engine log lines
pub struct LogParser;

impl LogParser {
    /// Parse the leading timestamp of a log line using the engine's grammar
    pub fn parse_timestamp(line: &str, engine: &Engine) -> Result<DateTime<Utc>, TimestampError> {
        match engine {
            Engine::MySql | Engine::MariaDb => Self::parse_mysql(line),
            Engine::Postgres => Self::parse_postgres(line),
            Engine::Unsupported(name) => Err(TimestampError::UnsupportedEngine(name.clone())),
        }
    }

    /// First space-delimited token is the timestamp
    fn parse_mysql(line: &str) -> Result<DateTime<Utc>, TimestampError> {
        let token = line.split(' ').next().unwrap_or_default();
        let ts = NaiveDateTime::parse_from_str(token, MYSQL_TIMESTAMP_FORMAT)?;
        Ok(ts.and_utc())
    }

    /// Everything before the first " UTC" is the timestamp
    fn parse_postgres(line: &str) -> Result<DateTime<Utc>, TimestampError> {
        let prefix = line.split(" UTC").next().unwrap_or_default();
        let ts = NaiveDateTime::parse_from_str(prefix, POSTGRES_TIMESTAMP_FORMAT)?;
        Ok(ts.and_utc())
    }
}
