//! Park vegetation — scatters trees uniformly over a park's usable square.
//!
//! No spacing or collision rules: trees may cluster, touch, or coincide.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::CityConfig;
use crate::math::Rect;

/// A single tree handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreePlacement {
    /// World-space (x, z) of the trunk.
    pub position: Vec2,
    /// Elevation the trunk stands on (curb top).
    pub base_elevation: f32,
    pub height: f32,
    /// Canopy yaw in radians, in `[0, 1)`.
    pub rotation: f32,
}

pub struct VegetationScatterer {
    density_cap: u32,
    min_height: f32,
    max_height: f32,
    base_elevation: f32,
}

impl VegetationScatterer {
    pub fn new(density_cap: u32, min_height: f32, max_height: f32, base_elevation: f32) -> Self {
        Self {
            density_cap,
            min_height,
            max_height,
            base_elevation,
        }
    }

    pub fn from_config(config: &CityConfig) -> Self {
        Self::new(
            config.maximum_tree_density,
            config.min_tree_height,
            config.max_tree_height,
            config.curb_height,
        )
    }

    /// Scatter `[0, density_cap]` trees over the square of side `size` centered at `center`.
    pub fn scatter<R: Rng + ?Sized>(&self, center: Vec2, size: f32, rng: &mut R) -> Vec<TreePlacement> {
        self.scatter_in(Rect::square(center, size), rng)
    }

    /// Scatter over an arbitrary plan-view area. Axes are drawn independently.
    pub fn scatter_in<R: Rng + ?Sized>(&self, area: Rect, rng: &mut R) -> Vec<TreePlacement> {
        let count = rng.gen_range(0..=self.density_cap);
        (0..count)
            .map(|_| TreePlacement {
                position: Vec2::new(
                    rng.gen_range(area.min.x..=area.max.x),
                    rng.gen_range(area.min.y..=area.max.y),
                ),
                base_elevation: self.base_elevation,
                height: rng.gen_range(self.min_height..=self.max_height),
                rotation: rng.gen_range(0.0..1.0),
            })
            .collect()
    }
}
