pub mod profiles;

pub use profiles::{find_gpu, search_gpus, GpuSpec, GPU_CATALOG};
