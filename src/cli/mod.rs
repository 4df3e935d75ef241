pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use vram_estimator::Quantization;

#[derive(Parser)]
#[command(name = "vram-estimator")]
#[command(about = "Estimate GPU memory for transformer inference", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Manual model parameters; each one overrides the value from --config
#[derive(Args, Debug, Default)]
pub struct ModelOverrides {
    /// Total parameter count, e.g. 70B, 1.5B or 7000000000
    #[arg(long)]
    pub total_parameters: Option<String>,
    #[arg(long)]
    pub num_layers: Option<u64>,
    #[arg(long)]
    pub hidden_size: Option<u64>,
    #[arg(long)]
    pub num_attention_heads: Option<u64>,
    #[arg(long)]
    pub num_kv_heads: Option<u64>,
    #[arg(long)]
    pub head_dim: Option<u64>,
}

/// Workload and GPU flags; each one overrides the settings file
#[derive(Args, Debug, Default)]
pub struct WorkloadOverrides {
    /// FP16, BF16, FP8, INT8 or INT4
    #[arg(long)]
    pub quantization: Option<Quantization>,
    #[arg(long)]
    pub batch_size: Option<u32>,
    #[arg(long)]
    pub seq_length: Option<u32>,
    /// System overhead as a percentage of model memory
    #[arg(long)]
    pub overhead: Option<f64>,
    /// GPU model name from the catalog (see `gpus`)
    #[arg(long)]
    pub gpu: Option<String>,
    /// GPU memory in GB (overrides --gpu capacity)
    #[arg(long)]
    pub gpu_memory: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a model config.json into canonical parameters
    Normalize {
        /// Path to the model config document (JSON)
        #[arg(long)]
        config: String,
        /// Do not estimate the parameter count when it is missing
        #[arg(long)]
        no_estimate: bool,
        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Estimate VRAM for a model and workload
    Estimate {
        /// Path to the model config document (JSON)
        #[arg(long)]
        config: Option<String>,
        /// Settings file with default workload and GPU (JSON)
        #[arg(long)]
        settings: Option<String>,
        #[command(flatten)]
        model: ModelOverrides,
        #[command(flatten)]
        workload: WorkloadOverrides,
        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// List known GPUs
    Gpus {
        /// Filter by model name (case-insensitive substring)
        #[arg(long)]
        search: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            config,
            no_estimate,
            json,
        } => commands::normalize(config, no_estimate, json),
        Commands::Estimate {
            config,
            settings,
            model,
            workload,
            json,
        } => commands::estimate(config, settings, model, workload, json),
        Commands::Gpus { search } => commands::gpus(search),
    }
}
