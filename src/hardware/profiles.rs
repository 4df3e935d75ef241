//! GPU specifications

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuSpec {
    pub model_name: String,
    pub manufacturer: String,
    #[serde(rename = "vramCapacityGB")]
    pub vram_capacity_gb: f64,
    pub architecture: String,
    pub release_year: u16,
}

fn gpu(model_name: &str, manufacturer: &str, vram_gb: f64, architecture: &str, year: u16) -> GpuSpec {
    GpuSpec {
        model_name: model_name.to_string(),
        manufacturer: manufacturer.to_string(),
        vram_capacity_gb: vram_gb,
        architecture: architecture.to_string(),
        release_year: year,
    }
}

/// Known GPUs, sorted by manufacturer then model name
pub static GPU_CATALOG: Lazy<Vec<GpuSpec>> = Lazy::new(|| {
    let mut gpus = vec![
        // NVIDIA data center
        gpu("B200", "NVIDIA", 192.0, "Blackwell", 2024),
        gpu("H200 SXM 141 GB", "NVIDIA", 141.0, "Hopper", 2024),
        gpu("H100 SXM5 80 GB", "NVIDIA", 80.0, "Hopper", 2022),
        gpu("H100 PCIe 80 GB", "NVIDIA", 80.0, "Hopper", 2022),
        gpu("H800 SXM5", "NVIDIA", 80.0, "Hopper", 2023),
        gpu("H20", "NVIDIA", 96.0, "Hopper", 2024),
        gpu("A100 SXM4 80 GB", "NVIDIA", 80.0, "Ampere", 2020),
        gpu("A100 PCIe 40 GB", "NVIDIA", 40.0, "Ampere", 2020),
        gpu("A800 PCIe 80 GB", "NVIDIA", 80.0, "Ampere", 2022),
        gpu("L40S", "NVIDIA", 48.0, "Ada Lovelace", 2023),
        gpu("L20", "NVIDIA", 48.0, "Ada Lovelace", 2023),
        gpu("L4", "NVIDIA", 24.0, "Ada Lovelace", 2023),
        gpu("A10G", "NVIDIA", 24.0, "Ampere", 2021),
        gpu("A40 PCIe", "NVIDIA", 48.0, "Ampere", 2020),
        gpu("Tesla V100 SXM2 32 GB", "NVIDIA", 32.0, "Volta", 2018),
        gpu("Tesla T4", "NVIDIA", 16.0, "Turing", 2018),
        // NVIDIA workstation / consumer
        gpu("RTX 6000 Ada Generation", "NVIDIA", 48.0, "Ada Lovelace", 2022),
        gpu("RTX A6000", "NVIDIA", 48.0, "Ampere", 2020),
        gpu("GeForce RTX 5090", "NVIDIA", 32.0, "Blackwell", 2025),
        gpu("GeForce RTX 4090", "NVIDIA", 24.0, "Ada Lovelace", 2022),
        gpu("GeForce RTX 4080", "NVIDIA", 16.0, "Ada Lovelace", 2022),
        gpu("GeForce RTX 3090", "NVIDIA", 24.0, "Ampere", 2020),
        gpu("GeForce RTX 3060 12 GB", "NVIDIA", 12.0, "Ampere", 2021),
        // AMD
        gpu("Radeon Instinct MI300X", "AMD", 192.0, "CDNA 3.0", 2023),
        gpu("Radeon Instinct MI250X", "AMD", 128.0, "CDNA 2.0", 2021),
        gpu("Radeon Instinct MI210", "AMD", 64.0, "CDNA 2.0", 2022),
        gpu("Radeon RX 7900 XTX", "AMD", 24.0, "RDNA 3.0", 2022),
        // Intel
        gpu("Data Center GPU Max 1550", "Intel", 128.0, "Xe-HPC", 2023),
        gpu("Arc A770", "Intel", 16.0, "Alchemist", 2022),
    ];

    gpus.sort_by(|a, b| {
        (a.manufacturer.as_str(), a.model_name.as_str())
            .cmp(&(b.manufacturer.as_str(), b.model_name.as_str()))
    });
    gpus
});

/// Case-insensitive substring search on the model name. An empty query lists everything.
pub fn search_gpus(query: &str) -> Vec<&'static GpuSpec> {
    let query = query.trim().to_lowercase();
    GPU_CATALOG
        .iter()
        .filter(|g| g.model_name.to_lowercase().contains(&query))
        .collect()
}

/// Exact (case-insensitive) model name lookup
pub fn find_gpu(name: &str) -> Option<&'static GpuSpec> {
    let name = name.trim();
    GPU_CATALOG
        .iter()
        .find(|g| g.model_name.eq_ignore_ascii_case(name))
}
