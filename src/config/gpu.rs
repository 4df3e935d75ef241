use crate::hardware::find_gpu;
use serde::{Deserialize, Serialize};

/// Target GPU, either a catalog entry or an explicit memory size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuConfig {
    /// Catalog model name, e.g. "A100 SXM4 80 GB"
    pub name: Option<String>,
    /// Overrides the catalog capacity when set
    pub memory_gb: Option<f64>,
}

impl GpuConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(mem) = self.memory_gb {
            if mem <= 0.0 {
                anyhow::bail!("gpu memory_gb must be positive, got {}", mem);
            }
        }
        if let Some(name) = &self.name {
            if find_gpu(name).is_none() {
                anyhow::bail!("Unknown GPU: {}. Run 'vram-estimator gpus' to list known models", name);
            }
        }
        Ok(())
    }

    /// Capacity in GB: explicit memory first, then the catalog entry
    pub fn resolve_capacity_gb(&self) -> Option<f64> {
        self.memory_gb.or_else(|| {
            self.name
                .as_deref()
                .and_then(find_gpu)
                .map(|g| g.vram_capacity_gb)
        })
    }
}
