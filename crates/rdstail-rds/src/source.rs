use async_trait::async_trait;

use rdstail_types::{Engine, LogFileInfo, LogPortion, TailError};

/// The three RDS calls the tailer needs
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Look up the engine family of an instance
    async fn describe_engine(&self, instance: &str) -> Result<Engine, TailError>;

    /// List log files, optionally only those written at or after `since_millis`
    async fn list_log_files(
        &self,
        instance: &str,
        since_millis: Option<i64>,
    ) -> Result<Vec<LogFileInfo>, TailError>;

    /// Download the next portion of a log file, resuming at `marker`
    async fn download_portion(
        &self,
        instance: &str,
        file_name: &str,
        marker: Option<&str>,
    ) -> Result<LogPortion, TailError>;
}
