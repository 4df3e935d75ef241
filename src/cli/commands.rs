//! CLI command implementations

use super::{ModelOverrides, WorkloadOverrides};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;
use vram_estimator::config::Config;
use vram_estimator::estimator::{estimate as estimate_vram, VramEstimation};
use vram_estimator::hardware::{find_gpu, search_gpus};
use vram_estimator::model::{
    normalize as normalize_doc, parse_config, validate_config, ModelParams,
    NormalizedModelParams, ParameterCount,
};

fn read_document(path: &str) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read model config {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Model config {} is not valid JSON", path))
}

fn print_missing_fields(params: &NormalizedModelParams) {
    let validation = validate_config(params);
    if !validation.valid {
        warn!(missing = ?validation.missing_fields, "model config is incomplete");
        println!(
            "  ⚠️  Missing fields: {} (estimate will be partial)",
            validation.missing_fields.join(", ")
        );
    }
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn normalize(config: String, no_estimate: bool, json: bool) -> Result<()> {
    let doc = read_document(&config)?;
    let params = if no_estimate {
        normalize_doc(&doc)
    } else {
        parse_config(&doc)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    println!();
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║  {}", params.model_name);
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("  Model type:          {}", fmt_opt(params.model_type.as_deref()));
    if let Some(archs) = &params.architectures {
        println!("  Architectures:       {}", archs.join(", "));
    }
    println!("  Total parameters:    {}", fmt_opt(params.total_parameters.as_ref()));
    println!("  Layers:              {}", fmt_opt(params.num_layers));
    println!("  Hidden size:         {}", fmt_opt(params.hidden_size));
    println!("  Attention heads:     {}", fmt_opt(params.num_attention_heads));
    println!("  KV heads:            {}", fmt_opt(params.num_kv_heads));
    println!("  Head dim:            {}", fmt_opt(params.head_dim));
    print_missing_fields(&params);
    println!();

    Ok(())
}

pub fn estimate(
    config: Option<String>,
    settings: Option<String>,
    model: ModelOverrides,
    workload: WorkloadOverrides,
    json: bool,
) -> Result<()> {
    let mut settings = match settings {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(q) = workload.quantization {
        settings.workload.quantization = q;
    }
    if let Some(b) = workload.batch_size {
        settings.workload.batch_size = b;
    }
    if let Some(s) = workload.seq_length {
        settings.workload.seq_length = s;
    }
    if let Some(o) = workload.overhead {
        settings.workload.system_overhead_percent = o;
    }
    if workload.gpu.is_some() {
        settings.gpu.name = workload.gpu;
    }
    if workload.gpu_memory.is_some() {
        settings.gpu.memory_gb = workload.gpu_memory;
    }
    settings.validate()?;

    let (model_name, base) = match config {
        Some(path) => {
            let normalized = parse_config(&read_document(&path)?);
            if !json {
                print_missing_fields(&normalized);
            }
            (normalized.model_name.clone(), ModelParams::from(&normalized))
        }
        None => ("Manual configuration".to_string(), ModelParams::default()),
    };

    let overrides = ModelParams {
        total_parameters: model.total_parameters.map(ParameterCount::Label),
        num_layers: model.num_layers,
        hidden_size: model.hidden_size,
        num_attention_heads: model.num_attention_heads,
        num_kv_heads: model.num_kv_heads,
        head_dim: model.head_dim,
    };
    let params = base.overlay(overrides);

    let workload = settings.workload.to_workload();
    let result = estimate_vram(&params, &workload, settings.gpu.resolve_capacity_gb())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_estimation(&model_name, &settings, &result);
    Ok(())
}

fn print_estimation(model_name: &str, settings: &Config, result: &VramEstimation) {
    let w = &settings.workload;

    println!();
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  {}", model_name);
    println!(
        "║  {} | batch {} | seq {} | overhead {}%",
        w.quantization, w.batch_size, w.seq_length, w.system_overhead_percent
    );
    println!("╚══════════════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Attention: {} ({})", result.attention_type, result.attention_judgment_reason);
    println!();

    for component in result.breakdown() {
        println!(
            "  {:<16} {:>10.2} GB ({:.1}%)",
            component.name, component.size_gb, component.percent_of_total
        );
    }
    println!("  {:<16} {:>10.2} GB", "Total", result.total_vram_gb);
    println!();
    println!("  KV cache: {}", result.kv_cache_formula);
    if !result.kv_cache_formula_with_values.is_empty() {
        println!("          = {}", result.kv_cache_formula_with_values);
    }

    if let (Some(gpus), Some(load), Some(capacity)) = (
        result.required_gpus,
        result.avg_gpu_load,
        result.gpu_vram_capacity_gb,
    ) {
        let gpu_label = settings
            .gpu
            .name
            .as_deref()
            .and_then(find_gpu)
            .map(|g| g.model_name.as_str())
            .unwrap_or("GPU");
        println!();
        println!(
            "  Required GPUs: {} × {} ({} GB) | Avg load: {:.1}%",
            gpus, gpu_label, capacity, load
        );
    }
    println!();
}

pub fn gpus(search: Option<String>) -> Result<()> {
    let results = search_gpus(search.as_deref().unwrap_or(""));

    if results.is_empty() {
        println!("No GPUs match '{}'", search.unwrap_or_default());
        return Ok(());
    }

    println!();
    println!("  {:<28} {:<10} {:>8}  {:<14} {}", "Model", "Vendor", "VRAM", "Architecture", "Year");
    for gpu in results {
        println!(
            "  {:<28} {:<10} {:>5} GB  {:<14} {}",
            gpu.model_name, gpu.manufacturer, gpu.vram_capacity_gb, gpu.architecture, gpu.release_year
        );
    }
    println!();
    Ok(())
}
