//! Optional configuration file for rdstail

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use rdstail_logs::{DEFAULT_MAX_PORTIONS, DEFAULT_POLL_INTERVAL, TailError};

/// Defaults read from a TOML file; CLI flags take precedence
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub interval_secs: Option<u64>,
    pub max_portions: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, TailError> {
        let content = fs::read_to_string(path)
            .map_err(|e| TailError::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| TailError::Config(format!("{}: {}", path.display(), e)))
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Settings after merging CLI flags over file defaults
#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub interval: Duration,
    /// `None` disables the per-file portion cap
    pub max_portions: Option<usize>,
}

impl Settings {
    pub fn merge(
        file: FileConfig,
        region: Option<String>,
        profile: Option<String>,
        interval_secs: Option<u64>,
        max_portions: Option<usize>,
    ) -> Result<Self, TailError> {
        let interval = match interval_secs.or(file.interval_secs) {
            Some(0) => {
                return Err(TailError::Config(
                    "interval must be at least 1 second".to_string(),
                ));
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_POLL_INTERVAL,
        };
        let max_portions = match max_portions.or(file.max_portions) {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_MAX_PORTIONS),
        };

        Ok(Self {
            region: region.or(file.region),
            profile: profile.or(file.profile),
            interval,
            max_portions,
        })
    }
}
