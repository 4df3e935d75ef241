//! Config normalization
//!
//! Turns a raw model-definition document (Hugging Face / ModelScope
//! `config.json`, GPT-2 style configs, T5 style configs, ...) into a
//! [`NormalizedModelParams`] record.
//!
//! Each canonical field has an ordered list of vendor synonyms. The first
//! synonym holding a usable value wins, so the order of each list is the
//! naming precedence.

use crate::model::params::{NormalizedModelParams, ParameterCount};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub const UNKNOWN_MODEL_NAME: &str = "Unknown Model";

pub const MODEL_NAME_KEYS: &[&str] = &["_name_or_path", "model_type"];
pub const TOTAL_PARAMETERS_KEYS: &[&str] = &["num_parameters"];
pub const NUM_LAYERS_KEYS: &[&str] = &["num_hidden_layers", "n_layer", "num_layers", "n_layers"];
pub const HIDDEN_SIZE_KEYS: &[&str] = &["hidden_size", "n_embd", "d_model"];
pub const NUM_ATTENTION_HEADS_KEYS: &[&str] = &["num_attention_heads", "n_head", "num_heads"];
pub const NUM_KV_HEADS_KEYS: &[&str] = &["num_key_value_heads", "num_kv_heads", "n_head_kv"];
pub const HEAD_DIM_KEYS: &[&str] = &["head_dim"];

/// Fields that estimation needs to produce a complete result
const REQUIRED_FIELDS: &[&str] = &["numLayers", "numAttentionHeads", "headDim"];

/// Result of [`validate_config`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValidation {
    pub valid: bool,
    pub missing_fields: Vec<String>,
}

/// Normalize a raw config document.
///
/// Never fails: absent or malformed fields map to `None`. Only `model_name`
/// always carries a value.
pub fn normalize(doc: &Value) -> NormalizedModelParams {
    let empty = Map::new();
    let obj = doc.as_object().unwrap_or(&empty);

    let model_name = lookup_string(obj, MODEL_NAME_KEYS)
        .unwrap_or_else(|| UNKNOWN_MODEL_NAME.to_string());

    let num_layers = lookup_count(obj, NUM_LAYERS_KEYS);
    let hidden_size = lookup_count(obj, HIDDEN_SIZE_KEYS);
    let num_attention_heads = lookup_count(obj, NUM_ATTENTION_HEADS_KEYS);
    let num_kv_heads = lookup_count(obj, NUM_KV_HEADS_KEYS);

    let head_dim = lookup_count(obj, HEAD_DIM_KEYS).or(match (hidden_size, num_attention_heads) {
        (Some(hidden), Some(heads)) => Some(hidden / heads),
        _ => None,
    });

    let architectures = obj.get("architectures").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect::<Vec<_>>()
    });

    let normalized = NormalizedModelParams {
        model_name,
        total_parameters: TOTAL_PARAMETERS_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(as_parameter_count)),
        num_layers,
        hidden_size,
        num_attention_heads,
        num_kv_heads,
        head_dim,
        architectures,
        model_type: obj.get("model_type").and_then(Value::as_str).map(str::to_string),
        raw_config: doc.clone(),
    };

    debug!(
        model = %normalized.model_name,
        num_layers = ?normalized.num_layers,
        hidden_size = ?normalized.hidden_size,
        num_attention_heads = ?normalized.num_attention_heads,
        num_kv_heads = ?normalized.num_kv_heads,
        head_dim = ?normalized.head_dim,
        "normalized model config"
    );

    normalized
}

/// Rough parameter count for a dense transformer: `12 × num_layers × hidden_size²`.
///
/// Attention projections contribute about `4·h²` and the MLP about `8·h²`
/// per layer; embeddings and norms are ignored. Returns `None` unless both
/// `num_layers` and `hidden_size` are known.
pub fn estimate_total_parameters(params: &NormalizedModelParams) -> Option<u64> {
    let layers = params.num_layers?;
    let hidden = params.hidden_size?;
    12u64
        .checked_mul(layers)?
        .checked_mul(hidden)?
        .checked_mul(hidden)
}

impl NormalizedModelParams {
    /// Fill `total_parameters` from [`estimate_total_parameters`] when it is absent.
    ///
    /// An explicit value is always kept.
    pub fn with_estimated_parameters(mut self) -> Self {
        if self.total_parameters.is_none() {
            if let Some(estimated) = estimate_total_parameters(&self) {
                debug!(estimated, "estimated total parameters from layer geometry");
                self.total_parameters = Some(ParameterCount::from(estimated));
            }
        }
        self
    }
}

/// Normalize a document and back-fill the parameter count when possible
pub fn parse_config(doc: &Value) -> NormalizedModelParams {
    normalize(doc).with_estimated_parameters()
}

/// Same as [`parse_config`], starting from JSON text
pub fn parse_config_str(json: &str) -> Result<NormalizedModelParams, serde_json::Error> {
    let doc: Value = serde_json::from_str(json)?;
    Ok(parse_config(&doc))
}

/// Report which fields needed for a full estimate are missing.
///
/// Advisory only: estimation still runs on partial input.
pub fn validate_config(params: &NormalizedModelParams) -> ConfigValidation {
    let missing_fields: Vec<String> = REQUIRED_FIELDS
        .iter()
        .zip([params.num_layers, params.num_attention_heads, params.head_dim])
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    ConfigValidation {
        valid: missing_fields.is_empty(),
        missing_fields,
    }
}

fn lookup_count(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| obj.get(*key).and_then(as_count))
}

fn lookup_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Positive integral number, otherwise `None` so the next synonym is tried
fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return (n > 0).then_some(n);
    }
    let f = value.as_f64()?;
    (f > 0.0 && f.fract() == 0.0 && f < u64::MAX as f64).then_some(f as u64)
}

fn as_parameter_count(value: &Value) -> Option<ParameterCount> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| *f > 0.0).map(ParameterCount::Count),
        Value::String(s) if !s.trim().is_empty() => Some(ParameterCount::Label(s.clone())),
        _ => None,
    }
}
