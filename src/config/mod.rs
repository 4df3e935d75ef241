pub mod gpu;
pub mod workload;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use gpu::GpuConfig;
pub use workload::WorkloadConfig;

/// Estimator settings: default workload and target GPU
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workload: WorkloadConfig,
    pub gpu: GpuConfig,
}

impl Config {
    /// Load settings from a JSON file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.workload.validate()?;
        self.gpu.validate()?;
        Ok(())
    }

    pub fn to_dict(&self) -> anyhow::Result<HashMap<String, serde_json::Value>> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }

    pub fn from_dict(data: HashMap<String, serde_json::Value>) -> anyhow::Result<Self> {
        let json = serde_json::to_string(&data)?;
        Ok(serde_json::from_str(&json)?)
    }
}
