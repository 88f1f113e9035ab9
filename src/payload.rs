use crate::error::{HarvestError, HarvestResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// The blob every account submits during a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestPayload {
    pub url: String,
    #[serde(default)]
    pub harvested_data: Value,
}

#[async_trait]
pub trait PayloadSource: Send + Sync {
    async fn load(&self) -> HarvestResult<HarvestPayload>;
}

#[derive(Debug, Clone)]
pub struct FilePayloadSource {
    path: PathBuf,
}

impl FilePayloadSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PayloadSource for FilePayloadSource {
    async fn load(&self) -> HarvestResult<HarvestPayload> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| HarvestError::Payload(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| HarvestError::Payload(format!("{}: {}", self.path.display(), e)))
    }
}
