//! Scripted in-memory log source for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use rdstail_rds::LogSource;
use rdstail_types::{Engine, LogFileInfo, LogPortion, TailError};

type PortionKey = (String, Option<String>);

/// Answers downloads by (file, marker) so repeated requests are stable
#[derive(Default)]
pub struct ScriptedSource {
    engine: Option<Engine>,
    files: Vec<LogFileInfo>,
    list_failure: Option<String>,
    portions: HashMap<PortionKey, Result<LogPortion, String>>,
    listings: Mutex<Vec<Option<i64>>>,
    downloads: Mutex<Vec<PortionKey>>,
}

impl ScriptedSource {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Some(engine),
            ..Default::default()
        }
    }

    /// A source whose instance lookup finds nothing
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, last_written: i64) -> Self {
        self.files.push(LogFileInfo::new(name, last_written));
        self
    }

    pub fn with_list_failure(mut self, message: &str) -> Self {
        self.list_failure = Some(message.to_string());
        self
    }

    pub fn with_portion(mut self, file: &str, marker: Option<&str>, portion: LogPortion) -> Self {
        self.portions
            .insert(key(file, marker), Ok(portion));
        self
    }

    pub fn with_failure(mut self, file: &str, marker: Option<&str>, message: &str) -> Self {
        self.portions
            .insert(key(file, marker), Err(message.to_string()));
        self
    }

    /// `since_millis` of every listing request, in order
    pub fn listings(&self) -> Vec<Option<i64>> {
        self.listings.lock().unwrap().clone()
    }

    /// (file, marker) of every download request, in order
    pub fn downloads(&self) -> Vec<PortionKey> {
        self.downloads.lock().unwrap().clone()
    }
}

fn key(file: &str, marker: Option<&str>) -> PortionKey {
    (file.to_string(), marker.map(str::to_string))
}

#[async_trait]
impl LogSource for ScriptedSource {
    async fn describe_engine(&self, instance: &str) -> Result<Engine, TailError> {
        self.engine
            .clone()
            .ok_or_else(|| TailError::InstanceNotFound(instance.to_string()))
    }

    async fn list_log_files(
        &self,
        _instance: &str,
        since_millis: Option<i64>,
    ) -> Result<Vec<LogFileInfo>, TailError> {
        self.listings.lock().unwrap().push(since_millis);
        match &self.list_failure {
            Some(message) => Err(TailError::List(message.clone())),
            None => Ok(self.files.clone()),
        }
    }

    async fn download_portion(
        &self,
        _instance: &str,
        file_name: &str,
        marker: Option<&str>,
    ) -> Result<LogPortion, TailError> {
        let key = key(file_name, marker);
        self.downloads.lock().unwrap().push(key.clone());
        match self.portions.get(&key) {
            Some(Ok(portion)) => Ok(portion.clone()),
            Some(Err(message)) => Err(TailError::Fetch(message.clone())),
            None => Err(TailError::Fetch(format!("no portion scripted for {:?}", key))),
        }
    }
}
