use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SYSTEM_OVERHEAD_PERCENT: f64 = 20.0;

/// Numeric precision used to store weights and the KV cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quantization {
    Fp16,
    Bf16,
    Fp8,
    Int8,
    Int4,
}

impl Quantization {
    pub const ALL: [Quantization; 5] = [
        Quantization::Fp16,
        Quantization::Bf16,
        Quantization::Fp8,
        Quantization::Int8,
        Quantization::Int4,
    ];

    pub fn bytes_per_parameter(self) -> f64 {
        match self {
            Quantization::Fp16 | Quantization::Bf16 => 2.0,
            Quantization::Fp8 | Quantization::Int8 => 1.0,
            Quantization::Int4 => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quantization::Fp16 => "FP16",
            Quantization::Bf16 => "BF16",
            Quantization::Fp8 => "FP8",
            Quantization::Int8 => "INT8",
            Quantization::Int4 => "INT4",
        }
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown quantization: {0} (expected one of FP16, BF16, FP8, INT8, INT4)")]
pub struct UnknownQuantization(pub String);

impl FromStr for Quantization {
    type Err = UnknownQuantization;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_uppercase();
        Quantization::ALL
            .into_iter()
            .find(|q| q.as_str() == tag)
            .ok_or_else(|| UnknownQuantization(s.to_string()))
    }
}

/// Inference workload profile supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceWorkload {
    pub quantization: Quantization,
    pub batch_size: u32,
    pub seq_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_overhead_percent: Option<f64>,
}

impl InferenceWorkload {
    pub fn new(quantization: Quantization, batch_size: u32, seq_length: u32) -> Self {
        Self {
            quantization,
            batch_size,
            seq_length,
            system_overhead_percent: None,
        }
    }

    pub fn with_overhead_percent(mut self, percent: f64) -> Self {
        self.system_overhead_percent = Some(percent);
        self
    }

    pub fn effective_overhead_percent(&self) -> f64 {
        self.system_overhead_percent
            .unwrap_or(DEFAULT_SYSTEM_OVERHEAD_PERCENT)
    }
}
