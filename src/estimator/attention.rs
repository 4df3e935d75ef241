//! Attention architecture classification

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttentionType {
    #[serde(rename = "MHA")]
    Mha,
    #[serde(rename = "GQA")]
    Gqa,
    #[serde(rename = "MQA")]
    Mqa,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl AttentionType {
    pub fn as_str(self) -> &'static str {
        match self {
            AttentionType::Mha => "MHA",
            AttentionType::Gqa => "GQA",
            AttentionType::Mqa => "MQA",
            AttentionType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AttentionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attention type plus the reason it was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionClassification {
    #[serde(rename = "type")]
    pub attention_type: AttentionType,
    pub reason: String,
}

impl AttentionClassification {
    fn new(attention_type: AttentionType, reason: impl Into<String>) -> Self {
        Self {
            attention_type,
            reason: reason.into(),
        }
    }
}

/// Classify the attention architecture from head counts.
///
/// Checks run in a fixed order and the first match wins:
/// 1. no query head count: UNKNOWN
/// 2. no KV head count: MHA (one KV head per query head is assumed)
/// 3. equal counts: MHA
/// 4. one KV head: MQA
/// 5. between one and the query head count: GQA
/// 6. anything else is an invalid config: UNKNOWN
pub fn determine_attention_type(
    num_attention_heads: Option<u64>,
    num_kv_heads: Option<u64>,
) -> AttentionClassification {
    let Some(heads) = num_attention_heads else {
        return AttentionClassification::new(
            AttentionType::Unknown,
            "num_attention_heads not provided, cannot determine attention type",
        );
    };

    let Some(kv_heads) = num_kv_heads else {
        return AttentionClassification::new(
            AttentionType::Mha,
            "num_kv_heads not provided, defaulting to MHA (num_kv_heads = num_attention_heads)",
        );
    };

    if kv_heads == heads {
        return AttentionClassification::new(
            AttentionType::Mha,
            format!(
                "num_kv_heads ({}) == num_attention_heads ({})",
                kv_heads, heads
            ),
        );
    }

    if kv_heads == 1 {
        return AttentionClassification::new(
            AttentionType::Mqa,
            "num_kv_heads == 1 (all query heads share a single KV head)",
        );
    }

    if kv_heads > 1 && kv_heads < heads {
        return AttentionClassification::new(
            AttentionType::Gqa,
            format!(
                "1 < num_kv_heads ({}) < num_attention_heads ({})",
                kv_heads, heads
            ),
        );
    }

    if kv_heads == 0 {
        return AttentionClassification::new(
            AttentionType::Unknown,
            "invalid configuration: num_kv_heads (0) must be at least 1",
        );
    }

    AttentionClassification::new(
        AttentionType::Unknown,
        format!(
            "invalid configuration: num_kv_heads ({}) > num_attention_heads ({})",
            kv_heads, heads
        ),
    )
}
