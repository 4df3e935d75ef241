//! VRAM estimation for transformer inference
//!
//! Estimates the GPU memory needed to serve a transformer language model from
//! a partially specified model description and an inference workload.
//!
//! ## Main Components
//!
//! - `model`: normalizes vendor `config.json` documents into canonical parameters
//! - `estimator`: attention classification, weight / KV cache / overhead memory, GPU sizing
//! - `hardware`: built-in GPU catalog
//! - `config`: default workload and GPU settings

pub mod config;
pub mod estimator;
pub mod hardware;
pub mod model;

pub use config::Config;
pub use estimator::{
    estimate, AttentionType, InferenceWorkload, ParameterCountError, Quantization, VramEstimation,
};
pub use model::{normalize, parse_config, ModelParams, NormalizedModelParams, ParameterCount};

/// Library errors
pub use anyhow::{Error, Result};
