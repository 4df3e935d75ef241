//! Memory component calculations: model weights and KV cache

use crate::estimator::attention::AttentionType;
use crate::estimator::workload::{InferenceWorkload, Quantization};
use crate::model::{ModelParams, ParameterCount};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterCountError {
    #[error("invalid parameter count format: {0}")]
    InvalidFormat(String),
}

static PARAMETER_COUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)([KMB])?$").unwrap());

/// Parse a parameter count such as `"70B"`, `"1.5B"`, `"350M"` or a plain number.
///
/// Suffixes are case-insensitive and must directly follow the number.
/// Numeric counts must be finite and non-negative.
pub fn parse_parameter_count(value: &ParameterCount) -> Result<f64, ParameterCountError> {
    let raw = match value {
        ParameterCount::Count(n) if n.is_finite() && *n >= 0.0 => return Ok(*n),
        ParameterCount::Count(n) => return Err(ParameterCountError::InvalidFormat(n.to_string())),
        ParameterCount::Label(s) => s,
    };

    let normalized = raw.trim().to_uppercase();
    let caps = PARAMETER_COUNT_PATTERN
        .captures(&normalized)
        .ok_or_else(|| ParameterCountError::InvalidFormat(raw.clone()))?;

    let number: f64 = caps[1]
        .parse()
        .map_err(|_| ParameterCountError::InvalidFormat(raw.clone()))?;

    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("B") => 1e9,
        Some("M") => 1e6,
        Some("K") => 1e3,
        _ => 1.0,
    };

    Ok(number * multiplier)
}

/// Weight memory in GiB. A missing parameter count yields 0.
pub fn model_memory_gb(
    params: &ModelParams,
    quantization: Quantization,
) -> Result<f64, ParameterCountError> {
    let count = match &params.total_parameters {
        Some(total) => parse_parameter_count(total)?,
        None => 0.0,
    };
    Ok(count * quantization.bytes_per_parameter() / BYTES_PER_GIB)
}

/// KV cache size with the formula used to compute it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KvCacheEstimate {
    #[serde(rename = "sizeGB")]
    pub size_gb: f64,
    pub formula: String,
    pub formula_with_values: String,
}

impl KvCacheEstimate {
    fn unavailable(formula: &str) -> Self {
        Self {
            size_gb: 0.0,
            formula: formula.to_string(),
            formula_with_values: String::new(),
        }
    }
}

/// KV cache memory in GiB for the given attention type.
///
/// `2 × batch_size × seq_len × num_layers × (kv_heads × head_dim) × dtype_bytes`,
/// where `kv_heads` is the query head count for MHA, the KV head count for
/// GQA, and 1 for MQA. Missing or zero `num_layers`/`head_dim` give a zero
/// size with an explanation in `formula`.
pub fn kv_cache_gb(
    params: &ModelParams,
    workload: &InferenceWorkload,
    attention_type: AttentionType,
) -> KvCacheEstimate {
    let (num_layers, head_dim) = match (params.num_layers, params.head_dim) {
        (Some(layers), Some(dim)) if layers > 0 && dim > 0 => (layers, dim),
        _ => {
            warn!("num_layers or head_dim missing or zero, KV cache counted as 0");
            return KvCacheEstimate::unavailable("KV cache requires num_layers and head_dim");
        }
    };

    let (kv_heads, heads_symbol) = match attention_type {
        AttentionType::Mha => (params.num_attention_heads.unwrap_or(0), "num_attention_heads"),
        AttentionType::Gqa => (params.num_kv_heads.unwrap_or(0), "num_kv_heads"),
        AttentionType::Mqa => (1, "1"),
        AttentionType::Unknown => {
            warn!("attention type unknown, KV cache counted as 0");
            return KvCacheEstimate::unavailable("cannot compute: attention type unknown");
        }
    };

    let dtype_bytes = workload.quantization.bytes_per_parameter();
    let bytes = 2.0
        * workload.batch_size as f64
        * workload.seq_length as f64
        * num_layers as f64
        * (kv_heads as f64 * head_dim as f64)
        * dtype_bytes;

    KvCacheEstimate {
        size_gb: bytes / BYTES_PER_GIB,
        formula: format!(
            "2 × batch_size × seq_len × num_layers × ({} × head_dim) × dtype_bytes",
            heads_symbol
        ),
        formula_with_values: format!(
            "2 × {} × {} × {} × ({} × {}) × {} bytes",
            workload.batch_size, workload.seq_length, num_layers, kv_heads, head_dim, dtype_bytes
        ),
    }
}
