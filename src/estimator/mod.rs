//! VRAM estimation for transformer inference
//!
//! Total VRAM is the sum of three components:
//! - model weights: `parameters × bytes_per_parameter`
//! - KV cache: depends on the attention architecture (MHA / GQA / MQA)
//! - system overhead: a percentage of the weight memory
//!
//! When a GPU capacity is given the estimate also reports how many GPUs are
//! needed and the average fill across them.

pub mod attention;
pub mod memory;
pub mod workload;

use crate::model::ModelParams;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use attention::{determine_attention_type, AttentionClassification, AttentionType};
pub use memory::{
    kv_cache_gb, model_memory_gb, parse_parameter_count, KvCacheEstimate, ParameterCountError,
    BYTES_PER_GIB,
};
pub use workload::{InferenceWorkload, Quantization, DEFAULT_SYSTEM_OVERHEAD_PERCENT};

/// Result of [`estimate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VramEstimation {
    #[serde(rename = "modelMemoryGB")]
    pub model_memory_gb: f64,
    #[serde(rename = "kvCacheGB")]
    pub kv_cache_gb: f64,
    #[serde(rename = "systemOverheadGB")]
    pub system_overhead_gb: f64,
    #[serde(rename = "totalVRAMGB")]
    pub total_vram_gb: f64,

    #[serde(rename = "attentionType")]
    pub attention_type: AttentionType,
    #[serde(rename = "attentionJudgmentReason")]
    pub attention_judgment_reason: String,

    #[serde(rename = "kvCacheFormula")]
    pub kv_cache_formula: String,
    #[serde(rename = "kvCacheFormulaWithValues")]
    pub kv_cache_formula_with_values: String,

    #[serde(rename = "requiredGPUs", default, skip_serializing_if = "Option::is_none")]
    pub required_gpus: Option<u64>,
    /// Average fill percentage across `required_gpus`
    #[serde(rename = "avgGPULoad", default, skip_serializing_if = "Option::is_none")]
    pub avg_gpu_load: Option<f64>,
    #[serde(rename = "gpuVRAMCapacityGB", default, skip_serializing_if = "Option::is_none")]
    pub gpu_vram_capacity_gb: Option<f64>,
}

/// One slice of the total, for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryComponent {
    pub name: &'static str,
    pub size_gb: f64,
    pub percent_of_total: f64,
}

impl VramEstimation {
    /// Model weights, KV cache and overhead with their share of the total
    pub fn breakdown(&self) -> Vec<MemoryComponent> {
        [
            ("Model Memory", self.model_memory_gb),
            ("KV Cache", self.kv_cache_gb),
            ("System Overhead", self.system_overhead_gb),
        ]
        .into_iter()
        .map(|(name, size_gb)| MemoryComponent {
            name,
            size_gb,
            percent_of_total: if self.total_vram_gb > 0.0 {
                size_gb / self.total_vram_gb * 100.0
            } else {
                0.0
            },
        })
        .collect()
    }
}

/// Estimate VRAM for `params` under `workload`.
///
/// Fails only when `params.total_parameters` is a malformed string. Missing
/// model fields degrade the result (zero KV cache, UNKNOWN attention) instead.
pub fn estimate(
    params: &ModelParams,
    workload: &InferenceWorkload,
    gpu_capacity_gb: Option<f64>,
) -> Result<VramEstimation, ParameterCountError> {
    let classification =
        determine_attention_type(params.num_attention_heads, params.num_kv_heads);
    debug!(
        attention = %classification.attention_type,
        reason = %classification.reason,
        "classified attention"
    );

    let model_memory_gb = model_memory_gb(params, workload.quantization)?;
    let kv_cache = kv_cache_gb(params, workload, classification.attention_type);
    let system_overhead_gb = model_memory_gb * workload.effective_overhead_percent() / 100.0;
    let total_vram_gb = model_memory_gb + kv_cache.size_gb + system_overhead_gb;

    let gpu_vram_capacity_gb = gpu_capacity_gb.filter(|capacity| *capacity > 0.0);
    let (required_gpus, avg_gpu_load) = match gpu_vram_capacity_gb {
        Some(capacity) => {
            let (gpus, load) = gpu_requirements(total_vram_gb, capacity);
            (Some(gpus), Some(load))
        }
        None => (None, None),
    };

    debug!(
        model_memory_gb,
        kv_cache_gb = kv_cache.size_gb,
        system_overhead_gb,
        total_vram_gb,
        required_gpus = ?required_gpus,
        "vram estimate"
    );

    Ok(VramEstimation {
        model_memory_gb,
        kv_cache_gb: kv_cache.size_gb,
        system_overhead_gb,
        total_vram_gb,
        attention_type: classification.attention_type,
        attention_judgment_reason: classification.reason,
        kv_cache_formula: kv_cache.formula,
        kv_cache_formula_with_values: kv_cache.formula_with_values,
        required_gpus,
        avg_gpu_load,
        gpu_vram_capacity_gb,
    })
}

/// GPU count and average load (%) for `total_gb` on cards of `capacity_gb`.
///
/// The count saturates at `u64::MAX`; the load is taken from the unrounded
/// count so it stays within 100% even then.
fn gpu_requirements(total_gb: f64, capacity_gb: f64) -> (u64, f64) {
    let gpus = (total_gb / capacity_gb).ceil();
    if gpus <= 0.0 {
        return (0, 0.0);
    }
    (gpus as u64, total_gb / gpus / capacity_gb * 100.0)
}
