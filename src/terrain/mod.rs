//! Terrain sampling and land-use classification

pub mod grid;
pub use grid::{CellKind, Grid};

pub mod noise_field;
pub use noise_field::{NoiseField, NoiseFieldSampler};

pub mod classify;
pub use classify::GridClassifier;
