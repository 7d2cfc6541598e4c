//! City generation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::types::{Result, Vec2};
use crate::terrain::classify::DEFAULT_OPEN_SPACE_BUILDING_LIMIT;

/// Deepest allowed building subdivision (at most 2^16 volumes per block).
pub const MAX_BLOCK_SUBDIVISIONS: u32 = 16;

/// Every tunable of one generation run. Unset JSON fields take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Run-level determinism key for noise and all per-cell draws.
    pub seed: u64,
    /// Blocks per side (N).
    pub grid_size: u32,
    /// Side length of one grid block, road included.
    pub block_size: f32,
    /// Gap kept between a curb edge and its buildings, and between split siblings.
    pub block_margin: f32,
    pub road_width: f32,
    /// Curb slab thickness; buildings and trees stand on top of it.
    pub curb_height: f32,
    pub min_building_height: f32,
    pub max_building_height: f32,
    /// Max height jitter of a volume around its block's base height.
    pub max_building_height_deviation: f32,
    /// Max offset of the cut line when a footprint is split in two.
    pub max_building_slice_deviation: f32,
    /// Percentage of `max_building_height` at or above which a volume counts as tall.
    pub tall_percentage_cutoff: f32,
    /// Recursion depth D for building subdivision.
    pub block_subdivisions: u32,
    /// Upper bound of the per-park tree count.
    pub maximum_tree_density: u32,
    pub min_tree_height: f32,
    pub max_tree_height: f32,
    /// Normalized terrain noise at or below this is ground.
    pub ground_threshold: f32,
    /// Normalized land-use noise above this is a building block.
    pub park_threshold: f32,
    /// Coordinate divisor of the terrain field (larger = smoother).
    pub general_noise_frequency: f64,
    /// Coordinate divisor of the land-use field.
    pub ground_noise_frequency: f64,
    /// Open cells with fewer surrounding buildings than this become parks.
    pub open_space_building_limit: u32,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            grid_size: 15,
            block_size: 150.0,
            block_margin: 10.0,
            road_width: 20.0,
            curb_height: 1.0,
            min_building_height: 50.0,
            max_building_height: 250.0,
            max_building_height_deviation: 15.0,
            max_building_slice_deviation: 20.0,
            tall_percentage_cutoff: 40.0,
            block_subdivisions: 2,
            maximum_tree_density: 70,
            min_tree_height: 4.0,
            max_tree_height: 10.0,
            ground_threshold: 0.85,
            park_threshold: 0.20,
            general_noise_frequency: 15.0,
            ground_noise_frequency: 8.0,
            open_space_building_limit: DEFAULT_OPEN_SPACE_BUILDING_LIMIT,
        }
    }
}

fn positive(name: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn unit_interval(name: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Threshold { name, value })
    }
}

fn frequency(name: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NoiseFrequency { name, value })
    }
}

impl CityConfig {
    /// Reject any option combination that cannot produce a well-formed city.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        positive("block_size", self.block_size)?;
        positive("block_margin", self.block_margin)?;
        positive("road_width", self.road_width)?;
        non_negative("curb_height", self.curb_height)?;
        if self.building_footprint_side() <= 0.0 {
            return Err(ConfigError::BlockGeometry {
                block_size: self.block_size,
                road_width: self.road_width,
                block_margin: self.block_margin,
            });
        }

        if !self.city_width().is_finite() {
            return Err(ConfigError::CityExtent);
        }

        positive("min_building_height", self.min_building_height)?;
        positive("max_building_height", self.max_building_height)?;
        if self.min_building_height > self.max_building_height {
            return Err(ConfigError::HeightRange {
                min: self.min_building_height,
                max: self.max_building_height,
            });
        }
        non_negative("max_building_height_deviation", self.max_building_height_deviation)?;
        if self.max_building_height_deviation > self.max_building_height {
            return Err(ConfigError::HeightDeviation {
                deviation: self.max_building_height_deviation,
                max: self.max_building_height,
            });
        }
        non_negative("max_building_slice_deviation", self.max_building_slice_deviation)?;
        if !(0.0..=100.0).contains(&self.tall_percentage_cutoff) {
            return Err(ConfigError::TallCutoff(self.tall_percentage_cutoff));
        }
        if self.block_subdivisions > MAX_BLOCK_SUBDIVISIONS {
            return Err(ConfigError::Subdivisions {
                value: self.block_subdivisions,
                max: MAX_BLOCK_SUBDIVISIONS,
            });
        }

        non_negative("min_tree_height", self.min_tree_height)?;
        non_negative("max_tree_height", self.max_tree_height)?;
        if self.min_tree_height > self.max_tree_height {
            return Err(ConfigError::TreeHeightRange {
                min: self.min_tree_height,
                max: self.max_tree_height,
            });
        }

        unit_interval("ground_threshold", self.ground_threshold)?;
        unit_interval("park_threshold", self.park_threshold)?;
        frequency("general_noise_frequency", self.general_noise_frequency)?;
        frequency("ground_noise_frequency", self.ground_noise_frequency)?;
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Full city side length for a grid of `grid_size` blocks.
    pub fn city_width_for(&self, grid_size: u32) -> f32 {
        self.block_size * grid_size as f32
    }

    pub fn city_width(&self) -> f32 {
        self.city_width_for(self.grid_size)
    }

    /// World-space (x, z) center of cell `(i, j)`; the city is centered on the origin.
    pub fn cell_center(&self, grid_size: u32, i: u32, j: u32) -> Vec2 {
        let half_city = self.city_width_for(grid_size) / 2.0;
        let half_block = self.block_size / 2.0;
        Vec2::new(
            i as f32 * self.block_size + half_block - half_city,
            j as f32 * self.block_size + half_block - half_city,
        )
    }

    /// Side of the raised curb slab inside a block (block minus road).
    pub fn curb_width(&self) -> f32 {
        self.block_size - self.road_width
    }

    /// Side of the building footprint, also the usable tree area of a park.
    pub fn building_footprint_side(&self) -> f32 {
        self.curb_width() - self.block_margin * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    #[test]
    fn test_default_is_valid() {
        let config = CityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.curb_width(), 130.0);
        assert_eq!(config.building_footprint_side(), 110.0);
        assert_eq!(config.city_width(), 2250.0);
    }

    #[test]
    fn test_rejects_zero_grid() {
        let config = CityConfig { grid_size: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::GridSize(0)));
    }

    #[test]
    fn test_rejects_thresholds_outside_unit_interval() {
        let config = CityConfig { ground_threshold: 1.5, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Threshold { name: "ground_threshold", .. })
        ));
        let config = CityConfig { park_threshold: -0.1, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Threshold { name: "park_threshold", .. })
        ));
        let config = CityConfig { park_threshold: f32::NAN, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_bounds_inclusive() {
        let config = CityConfig { ground_threshold: 1.0, park_threshold: 0.0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_tall_cutoff_out_of_range() {
        let config = CityConfig { tall_percentage_cutoff: 101.0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::TallCutoff(101.0)));
    }

    #[test]
    fn test_rejects_inverted_height_range() {
        let config = CityConfig {
            min_building_height: 300.0,
            max_building_height: 250.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::HeightRange { min: 300.0, max: 250.0 })
        );
    }

    #[test]
    fn test_rejects_non_positive_geometry() {
        let config = CityConfig { road_width: 0.0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "road_width", .. })
        ));
        let config = CityConfig { block_size: 30.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::BlockGeometry { .. })));
    }

    #[test]
    fn test_rejects_height_deviation_above_max_height() {
        let config = CityConfig { max_building_height_deviation: 2.0e38, ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::HeightDeviation { deviation: 2.0e38, max: 250.0 })
        );
        let config = CityConfig { max_building_height_deviation: 250.0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_overflowing_city_extent() {
        let config = CityConfig { block_size: 3.0e38, grid_size: 15, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::CityExtent));
    }

    #[test]
    fn test_rejects_deep_subdivision() {
        let config = CityConfig { block_subdivisions: 17, ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Subdivisions { value: 17, max: MAX_BLOCK_SUBDIVISIONS })
        );
    }

    #[test]
    fn test_cell_center_layout() {
        let config = CityConfig { grid_size: 2, block_size: 100.0, ..Default::default() };
        assert_eq!(config.cell_center(2, 0, 0), Vec2::new(-50.0, -50.0));
        assert_eq!(config.cell_center(2, 1, 0), Vec2::new(50.0, -50.0));
        assert_eq!(config.cell_center(1, 0, 0), Vec2::ZERO);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = CityConfig::from_json_str(r#"{ "seed": 7, "grid_size": 4 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.block_size, 150.0);
    }

    #[test]
    fn test_json_invalid_is_config_error() {
        let err = CityConfig::from_json_str(r#"{ "grid_size": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::GridSize(0))));
        let err = CityConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.json");
        let config = CityConfig { seed: 99, maximum_tree_density: 3, ..Default::default() };
        config.save(&path).unwrap();
        assert_eq!(CityConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CityConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
