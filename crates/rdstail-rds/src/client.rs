//! RDS client for rdstail

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_rds as rds;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_types::region::Region;

use crate::source::LogSource;
use rdstail_types::{Engine, LogFileInfo, LogPortion, TailError};

/// RDS client wrapper
#[derive(Clone)]
pub struct RdsClient {
    client: rds::Client,
}

impl RdsClient {
    /// Create a new RdsClient from the ambient AWS configuration
    ///
    /// Credentials are resolved once up front so that a missing or broken
    /// credential chain fails here instead of on the first API call.
    pub async fn from_env(
        region: Option<String>,
        profile: Option<String>,
    ) -> Result<Self, TailError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        let provider = config
            .credentials_provider()
            .ok_or_else(|| TailError::Credentials("no credentials provider found".to_string()))?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| TailError::Credentials(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(region = ?config.region(), "loaded AWS config");

        Ok(Self {
            client: rds::Client::new(&config),
        })
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: rds::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogSource for RdsClient {
    async fn describe_engine(&self, instance: &str) -> Result<Engine, TailError> {
        let output = match self
            .client
            .describe_db_instances()
            .db_instance_identifier(instance)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                // RDS answers an unknown identifier with a fault rather than an empty list
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_db_instance_not_found_fault());
                if not_found {
                    return Err(TailError::InstanceNotFound(instance.to_string()));
                }
                return Err(TailError::Lookup(DisplayErrorContext(&err).to_string()));
            }
        };

        let db_instance = output
            .db_instances
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| TailError::InstanceNotFound(instance.to_string()))?;

        let engine = db_instance.engine.unwrap_or_default();
        Ok(Engine::from(engine.as_str()))
    }

    async fn list_log_files(
        &self,
        instance: &str,
        since_millis: Option<i64>,
    ) -> Result<Vec<LogFileInfo>, TailError> {
        let mut pages = self
            .client
            .describe_db_log_files()
            .db_instance_identifier(instance)
            .set_file_last_written(since_millis)
            .into_paginator()
            .send();

        let mut files = Vec::new();
        while let Some(page) = pages
            .try_next()
            .await
            .map_err(|e| TailError::List(DisplayErrorContext(&e).to_string()))?
        {
            for details in page.describe_db_log_files.unwrap_or_default() {
                let Some(name) = details.log_file_name else {
                    continue;
                };
                files.push(LogFileInfo::new(
                    name,
                    details.last_written.unwrap_or_default(),
                ));
            }
        }

        Ok(files)
    }

    async fn download_portion(
        &self,
        instance: &str,
        file_name: &str,
        marker: Option<&str>,
    ) -> Result<LogPortion, TailError> {
        let output = self
            .client
            .download_db_log_file_portion()
            .db_instance_identifier(instance)
            .log_file_name(file_name)
            .set_marker(marker.map(str::to_string))
            .send()
            .await
            .map_err(|e| TailError::Fetch(DisplayErrorContext(&e).to_string()))?;

        Ok(LogPortion {
            data: output.log_file_data,
            marker: output.marker,
            pending: output.additional_data_pending.unwrap_or(false),
        })
    }
}
