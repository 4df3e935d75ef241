use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameter count as it appears in model documents and user input.
///
/// Either a plain number (`7000000000`) or a string with an optional
/// magnitude suffix (`"70B"`, `"1.5B"`, `"350M"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterCount {
    Count(f64),
    Label(String),
}

impl fmt::Display for ParameterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterCount::Count(n) => write!(f, "{}", n),
            ParameterCount::Label(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ParameterCount {
    fn from(n: u64) -> Self {
        ParameterCount::Count(n as f64)
    }
}

impl From<f64> for ParameterCount {
    fn from(n: f64) -> Self {
        ParameterCount::Count(n)
    }
}

impl From<&str> for ParameterCount {
    fn from(s: &str) -> Self {
        ParameterCount::Label(s.to_string())
    }
}

impl From<String> for ParameterCount {
    fn from(s: String) -> Self {
        ParameterCount::Label(s)
    }
}

/// Canonical model parameters extracted from a raw config document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedModelParams {
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_parameters: Option<ParameterCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_layers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_attention_heads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_kv_heads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_dim: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architectures: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    /// Input document, kept verbatim for display. Never read by the estimator.
    #[serde(default)]
    pub raw_config: serde_json::Value,
}

/// Parameter set consumed by the estimator.
///
/// Assembled by the caller from normalized values plus any manual overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_parameters: Option<ParameterCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_layers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_attention_heads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_kv_heads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_dim: Option<u64>,
}

impl ModelParams {
    /// Merge `overrides` on top of `self`; every field set in `overrides` wins.
    pub fn overlay(self, overrides: ModelParams) -> Self {
        Self {
            total_parameters: overrides.total_parameters.or(self.total_parameters),
            num_layers: overrides.num_layers.or(self.num_layers),
            hidden_size: overrides.hidden_size.or(self.hidden_size),
            num_attention_heads: overrides.num_attention_heads.or(self.num_attention_heads),
            num_kv_heads: overrides.num_kv_heads.or(self.num_kv_heads),
            head_dim: overrides.head_dim.or(self.head_dim),
        }
    }
}

impl From<&NormalizedModelParams> for ModelParams {
    fn from(normalized: &NormalizedModelParams) -> Self {
        Self {
            total_parameters: normalized.total_parameters.clone(),
            num_layers: normalized.num_layers,
            hidden_size: normalized.hidden_size,
            num_attention_heads: normalized.num_attention_heads,
            num_kv_heads: normalized.num_kv_heads,
            head_dim: normalized.head_dim,
        }
    }
}
