//! Citygen - procedural city layout generation
//!
//! Noise-driven terrain and land-use classification over a square grid,
//! recursive building subdivision and park vegetation scattering. The output
//! is plain data ([`generation::CityLayout`]) for a renderer to consume.

pub mod core;
pub mod math;
pub mod terrain;
pub mod generation;
