use vram_estimator::estimator::{
    determine_attention_type, estimate, kv_cache_gb, AttentionType, InferenceWorkload,
    Quantization, BYTES_PER_GIB,
};
use vram_estimator::model::ModelParams;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_llama_70b_gqa_int4() {
    // DeepSeek-R1-Distill-Llama-70B on A100 80GB
    let params = ModelParams {
        total_parameters: Some("70B".into()),
        num_layers: Some(80),
        hidden_size: Some(8192),
        num_attention_heads: Some(64),
        num_kv_heads: Some(8),
        head_dim: Some(128),
    };
    let workload = InferenceWorkload::new(Quantization::Int4, 32, 4096).with_overhead_percent(20.0);

    let result = estimate(&params, &workload, Some(80.0)).unwrap();

    assert_eq!(result.attention_type, AttentionType::Gqa);
    assert!(result.attention_judgment_reason.contains("64"));
    assert!(result.attention_judgment_reason.contains("8"));

    let model_gb = 70e9 * 0.5 / BYTES_PER_GIB;
    assert!(approx_eq(result.model_memory_gb, model_gb));
    assert!((result.model_memory_gb - 32.6).abs() < 0.01);

    // 2 × 32 × 4096 × 80 × (8 × 128) × 0.5 bytes = 10 GiB
    assert!(approx_eq(result.kv_cache_gb, 10.0));
    assert_eq!(result.kv_cache_formula_with_values, "2 × 32 × 4096 × 80 × (8 × 128) × 0.5 bytes");

    assert!(approx_eq(result.system_overhead_gb, model_gb * 0.2));
    assert!(approx_eq(
        result.total_vram_gb,
        result.model_memory_gb + result.kv_cache_gb + result.system_overhead_gb
    ));

    assert_eq!(result.required_gpus, Some((result.total_vram_gb / 80.0).ceil() as u64));
    assert_eq!(result.required_gpus, Some(1));
    let load = result.avg_gpu_load.unwrap();
    assert!(approx_eq(load, result.total_vram_gb / 80.0 * 100.0));
    assert_eq!(result.gpu_vram_capacity_gb, Some(80.0));
}

#[test]
fn test_gpt3_style_mha_needs_many_gpus() {
    let params = ModelParams {
        total_parameters: Some("175B".into()),
        num_layers: Some(96),
        hidden_size: Some(12288),
        num_attention_heads: Some(96),
        num_kv_heads: Some(96),
        head_dim: Some(128),
    };
    let workload = InferenceWorkload::new(Quantization::Fp16, 8, 2048);

    let result = estimate(&params, &workload, Some(40.0)).unwrap();

    assert_eq!(result.attention_type, AttentionType::Mha);
    assert!(approx_eq(result.kv_cache_gb, 72.0));
    assert_eq!(result.required_gpus, Some(12));
    let load = result.avg_gpu_load.unwrap();
    assert!(load > 0.0 && load <= 100.0);
}

#[test]
fn test_mqa_bf16() {
    let params = ModelParams {
        total_parameters: Some("7B".into()),
        num_layers: Some(32),
        hidden_size: Some(4096),
        num_attention_heads: Some(32),
        num_kv_heads: Some(1),
        head_dim: Some(128),
    };
    let workload = InferenceWorkload::new(Quantization::Bf16, 16, 8192);

    let result = estimate(&params, &workload, Some(24.0)).unwrap();

    assert_eq!(result.attention_type, AttentionType::Mqa);
    assert!(approx_eq(result.kv_cache_gb, 2.0));
    assert!(result.kv_cache_formula.contains("(1 × head_dim)"));
    assert_eq!(result.required_gpus, Some(1));
}

#[test]
fn test_missing_kv_heads_uses_attention_heads() {
    let params = ModelParams {
        total_parameters: Some("13B".into()),
        num_layers: Some(40),
        hidden_size: Some(5120),
        num_attention_heads: Some(40),
        num_kv_heads: None,
        head_dim: Some(128),
    };
    let workload = InferenceWorkload::new(Quantization::Int8, 4, 4096);

    let result = estimate(&params, &workload, None).unwrap();

    assert_eq!(result.attention_type, AttentionType::Mha);
    assert!(result.attention_judgment_reason.contains("defaulting to MHA"));
    // 2 × 4 × 4096 × 40 × (40 × 128) × 1 bytes = 6.25 GiB
    assert!(approx_eq(result.kv_cache_gb, 6.25));
    assert_eq!(result.kv_cache_formula_with_values, "2 × 4 × 4096 × 40 × (40 × 128) × 1 bytes");
    assert_eq!(result.required_gpus, None);
    assert_eq!(result.avg_gpu_load, None);
}

#[test]
fn test_unknown_attention_still_reports_weights() {
    let params = ModelParams {
        total_parameters: Some(7_000_000_000u64.into()),
        num_layers: Some(32),
        head_dim: Some(128),
        ..Default::default()
    };
    let workload = InferenceWorkload::new(Quantization::Fp16, 1, 2048);

    let result = estimate(&params, &workload, Some(24.0)).unwrap();

    assert_eq!(result.attention_type, AttentionType::Unknown);
    assert_eq!(result.kv_cache_gb, 0.0);
    assert!(result.kv_cache_formula.contains("attention type unknown"));
    assert!(approx_eq(result.model_memory_gb, 7e9 * 2.0 / BYTES_PER_GIB));
    assert_eq!(result.required_gpus, Some(1));
}

#[test]
fn test_empty_params_degrade_to_zero() {
    let workload = InferenceWorkload::new(Quantization::Fp16, 1, 1);
    let result = estimate(&ModelParams::default(), &workload, None).unwrap();

    assert_eq!(result.model_memory_gb, 0.0);
    assert_eq!(result.kv_cache_gb, 0.0);
    assert_eq!(result.system_overhead_gb, 0.0);
    assert_eq!(result.total_vram_gb, 0.0);
    assert_eq!(result.attention_type, AttentionType::Unknown);
}

#[test]
fn test_classification_table() {
    let cases = [
        (Some(64), Some(8), AttentionType::Gqa),
        (Some(96), Some(96), AttentionType::Mha),
        (Some(32), Some(1), AttentionType::Mqa),
        (Some(40), None, AttentionType::Mha),
        (None, Some(8), AttentionType::Unknown),
        (None, None, AttentionType::Unknown),
        (Some(8), Some(64), AttentionType::Unknown),
    ];

    for (heads, kv, expected) in cases {
        let result = determine_attention_type(heads, kv);
        assert_eq!(result.attention_type, expected, "heads={:?} kv={:?}", heads, kv);
        assert!(!result.reason.is_empty());
    }
}

#[test]
fn test_kv_cache_grows_with_batch_and_seq() {
    let params = ModelParams {
        num_layers: Some(32),
        num_attention_heads: Some(32),
        num_kv_heads: Some(8),
        head_dim: Some(128),
        ..Default::default()
    };

    let base = kv_cache_gb(&params, &InferenceWorkload::new(Quantization::Fp16, 1, 1024), AttentionType::Gqa);
    let more_batch = kv_cache_gb(&params, &InferenceWorkload::new(Quantization::Fp16, 2, 1024), AttentionType::Gqa);
    let more_seq = kv_cache_gb(&params, &InferenceWorkload::new(Quantization::Fp16, 1, 2048), AttentionType::Gqa);

    assert!(more_batch.size_gb > base.size_gb);
    assert!(more_seq.size_gb > base.size_gb);
    assert!(approx_eq(more_batch.size_gb, 2.0 * base.size_gb));
}

#[test]
fn test_estimation_json_field_names() {
    let params = ModelParams {
        total_parameters: Some("7B".into()),
        num_layers: Some(32),
        num_attention_heads: Some(32),
        num_kv_heads: Some(8),
        head_dim: Some(128),
        ..Default::default()
    };
    let workload = InferenceWorkload::new(Quantization::Int4, 1, 1024);
    let result = estimate(&params, &workload, Some(24.0)).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    for key in [
        "modelMemoryGB",
        "kvCacheGB",
        "systemOverheadGB",
        "totalVRAMGB",
        "attentionType",
        "attentionJudgmentReason",
        "kvCacheFormula",
        "kvCacheFormulaWithValues",
        "requiredGPUs",
        "avgGPULoad",
        "gpuVRAMCapacityGB",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["attentionType"], "GQA");
}
