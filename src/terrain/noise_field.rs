//! Coherent-noise scalar fields sampled over the city grid

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// Dense per-cell scalar field.
///
/// Raw fields hold non-negative noise magnitudes; after [`NoiseField::normalized`]
/// every value lies in `[0, 1]` with the field minimum at exactly 0.0 and the
/// maximum at exactly 1.0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseField {
    grid: Grid<f32>,
}

impl NoiseField {
    pub fn from_grid(grid: Grid<f32>) -> Self {
        Self { grid }
    }

    /// Build a field from scan-order values. Returns `None` unless `values`
    /// holds exactly `size * size` entries.
    pub fn from_values(size: u32, values: &[f32]) -> Option<Self> {
        if values.len() != size as usize * size as usize {
            return None;
        }
        let mut it = values.iter().copied();
        Some(Self {
            grid: Grid::from_fn(size, |_, _| it.next().unwrap_or_default()),
        })
    }

    pub fn size(&self) -> u32 {
        self.grid.size()
    }

    #[inline]
    pub fn get(&self, i: u32, j: u32) -> f32 {
        *self.grid.get(i, j)
    }

    pub fn values(&self) -> &[f32] {
        self.grid.values()
    }

    /// (min, max) over the whole field. `(0, 0)` for an empty field.
    pub fn bounds(&self) -> (f32, f32) {
        let values = self.grid.values();
        if values.is_empty() {
            return (0.0, 0.0);
        }
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (min, max)
    }

    /// Min-max normalize against this field's own global bounds.
    ///
    /// A constant field has no spread to stretch and maps to all zeros.
    pub fn normalized(&self) -> NoiseField {
        let (min, max) = self.bounds();
        let range = max - min;
        if range <= 0.0 {
            return NoiseField { grid: self.grid.map(|_| 0.0) };
        }
        NoiseField {
            grid: self.grid.map(|&v| (v - min) / range),
        }
    }
}

/// Samples 2D Perlin noise magnitudes over grid coordinates.
///
/// One sampler is built per run from the run seed; every field of the run is
/// drawn from the same permutation table so terrain and land use share the
/// same spatial structure at different frequencies.
pub struct NoiseFieldSampler {
    noise: Perlin,
    seed: u32,
}

impl NoiseFieldSampler {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            seed,
        }
    }

    /// Raw noise magnitude at grid coordinate `(i, j)`.
    ///
    /// Larger frequencies give smoother fields (coordinates are divided by it).
    pub fn value_at(&self, i: u32, j: u32, frequency: f64) -> f32 {
        let x = i as f64 / frequency;
        let y = j as f64 / frequency;
        self.noise.get([x, y]).abs() as f32
    }

    /// Raw (unnormalized) N x N field.
    pub fn sample_raw(&self, size: u32, frequency: f64) -> NoiseField {
        NoiseField::from_grid(Grid::from_fn(size, |i, j| self.value_at(i, j, frequency)))
    }

    /// N x N field normalized to `[0, 1]`.
    pub fn sample(&self, size: u32, frequency: f64) -> NoiseField {
        let field = self.sample_raw(size, frequency).normalized();
        log::debug!("Sampled {}x{} noise field (frequency {}, seed {})",
            size, size, frequency, self.seed);
        field
    }
}
