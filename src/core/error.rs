//! Error types for city generation

use thiserror::Error;

/// Main error type for the generator
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rejected configuration option. Raised before any generation starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid_size must be > 0 (got {0})")]
    GridSize(u32),

    #[error("{name} must lie in [0, 1] (got {value})")]
    Threshold { name: &'static str, value: f32 },

    #[error("tall_percentage_cutoff must lie in [0, 100] (got {0})")]
    TallCutoff(f32),

    #[error("min_building_height ({min}) exceeds max_building_height ({max})")]
    HeightRange { min: f32, max: f32 },

    #[error("max_building_height_deviation ({deviation}) exceeds max_building_height ({max})")]
    HeightDeviation { deviation: f32, max: f32 },

    #[error("block_size * grid_size overflows the city extent")]
    CityExtent,

    #[error("min_tree_height ({min}) exceeds max_tree_height ({max})")]
    TreeHeightRange { min: f32, max: f32 },

    #[error("{name} must be > 0 (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be >= 0 (got {value})")]
    Negative { name: &'static str, value: f32 },

    #[error("block_subdivisions must be <= {max} (got {value})")]
    Subdivisions { value: u32, max: u32 },

    #[error("block_size ({block_size}) leaves no building footprint after road_width ({road_width}) and two block_margin ({block_margin})")]
    BlockGeometry { block_size: f32, road_width: f32, block_margin: f32 },

    #[error("{name} must be a positive finite frequency (got {value})")]
    NoiseFrequency { name: &'static str, value: f64 },
}
