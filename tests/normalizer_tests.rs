use serde_json::json;
use vram_estimator::estimator::{estimate, AttentionType, InferenceWorkload, Quantization};
use vram_estimator::model::{
    normalize, parse_config, parse_config_str, validate_config, ModelParams, ParameterCount,
};

#[test]
fn test_normalize_is_idempotent() {
    let doc = json!({
        "_name_or_path": "Qwen/Qwen2-7B",
        "num_hidden_layers": 28,
        "hidden_size": 3584,
        "num_attention_heads": 28,
        "num_key_value_heads": 4
    });

    let first = normalize(&doc);
    let second = normalize(&doc);
    assert_eq!(first, second);
}

#[test]
fn test_derived_head_dim_matches_explicit() {
    let derived = normalize(&json!({ "hidden_size": 8192, "num_attention_heads": 64 }));
    let explicit = normalize(&json!({
        "hidden_size": 8192,
        "num_attention_heads": 64,
        "head_dim": 128
    }));

    assert_eq!(derived.head_dim, Some(128));
    assert_eq!(derived.head_dim, explicit.head_dim);
}

#[test]
fn test_parse_config_backfills_parameters() {
    let params = parse_config(&json!({ "n_layer": 24, "n_embd": 1024, "n_head": 16 }));
    assert_eq!(
        params.total_parameters,
        Some(ParameterCount::Count((12u64 * 24 * 1024 * 1024) as f64))
    );
}

#[test]
fn test_parse_config_str_rejects_bad_json() {
    assert!(parse_config_str("{ not json").is_err());

    let params = parse_config_str(r#"{ "model_type": "mistral" }"#).unwrap();
    assert_eq!(params.model_name, "mistral");
    assert_eq!(params.total_parameters, None);
    assert!(!validate_config(&params).valid);
}

#[test]
fn test_normalized_json_shape() {
    let params = normalize(&json!({ "num_parameters": "1.5B", "num_layers": 28 }));
    let value = serde_json::to_value(&params).unwrap();

    assert_eq!(value["modelName"], "Unknown Model");
    assert_eq!(value["totalParameters"], "1.5B");
    assert_eq!(value["numLayers"], 28);
    assert!(value.get("headDim").is_none());
    assert_eq!(value["rawConfig"]["num_layers"], 28);
}

#[test]
fn test_normalize_then_estimate_with_overrides() {
    let doc = json!({
        "_name_or_path": "meta-llama/Llama-2-13b-hf",
        "num_hidden_layers": 40,
        "hidden_size": 5120,
        "num_attention_heads": 40
    });

    let normalized = parse_config(&doc);
    let overrides = ModelParams {
        total_parameters: Some("13B".into()),
        ..Default::default()
    };
    let params = ModelParams::from(&normalized).overlay(overrides);

    let workload = InferenceWorkload::new(Quantization::Int8, 4, 4096);
    let result = estimate(&params, &workload, None).unwrap();

    assert_eq!(result.attention_type, AttentionType::Mha);
    assert!((result.kv_cache_gb - 6.25).abs() < 1e-9);
    assert!((result.model_memory_gb - 13e9 / (1024.0 * 1024.0 * 1024.0)).abs() < 1e-9);
}

#[test]
fn test_narrow_hidden_size_gives_no_kv_cache() {
    // hidden_size / num_attention_heads rounds down to 0
    let doc = json!({ "num_hidden_layers": 4, "hidden_size": 16, "num_attention_heads": 32 });
    let normalized = normalize(&doc);
    assert_eq!(normalized.head_dim, Some(0));

    let workload = InferenceWorkload::new(Quantization::Fp16, 1, 1);
    let result = estimate(&ModelParams::from(&normalized), &workload, None).unwrap();

    assert_eq!(result.attention_type, AttentionType::Mha);
    assert_eq!(result.kv_cache_gb, 0.0);
    assert_eq!(result.kv_cache_formula, "KV cache requires num_layers and head_dim");
    assert!(result.kv_cache_formula_with_values.is_empty());
}
