pub mod normalizer;
pub mod params;

pub use normalizer::{
    estimate_total_parameters, normalize, parse_config, parse_config_str, validate_config,
    ConfigValidation,
};
pub use params::{ModelParams, NormalizedModelParams, ParameterCount};
