use crate::estimator::{InferenceWorkload, Quantization, DEFAULT_SYSTEM_OVERHEAD_PERCENT};
use serde::{Deserialize, Serialize};

/// Default inference workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub quantization: Quantization,
    pub batch_size: u32,
    pub seq_length: u32,
    pub system_overhead_percent: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            quantization: Quantization::Int4,
            batch_size: 32,
            seq_length: 4096,
            system_overhead_percent: DEFAULT_SYSTEM_OVERHEAD_PERCENT,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size < 1 {
            anyhow::bail!("batch_size must be at least 1, got {}", self.batch_size);
        }
        if self.seq_length < 1 {
            anyhow::bail!("seq_length must be at least 1, got {}", self.seq_length);
        }
        if !(0.0..=100.0).contains(&self.system_overhead_percent) {
            anyhow::bail!(
                "system_overhead_percent must be in [0, 100], got {}",
                self.system_overhead_percent
            );
        }
        Ok(())
    }

    pub fn to_workload(&self) -> InferenceWorkload {
        InferenceWorkload::new(self.quantization, self.batch_size, self.seq_length)
            .with_overhead_percent(self.system_overhead_percent)
    }
}
