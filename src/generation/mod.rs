//! City generation pipeline — turns a seed and a config into a full layout.
//!
//! The pipeline orchestrates:
//! 1. Noise sampling (terrain + land-use fields from one seed)
//! 2. Grid classification (water / building / park / parking)
//! 3. Per-cell work after the classification barrier: building subdivision
//!    for building blocks, tree scattering for parks

pub mod config;
pub mod rng;
pub mod building_gen;
pub mod tree_gen;

pub use config::CityConfig;
pub use rng::RngSeq;
pub use building_gen::{BuildingSubdivider, BuildingVolume, Footprint, SplitAxis, Subdivision, SubdivisionParams};
pub use tree_gen::{TreePlacement, VegetationScatterer};

use glam::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::math::Rect;
use crate::terrain::{CellKind, Grid, GridClassifier, NoiseFieldSampler};

/// Street-level record for one ground cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub cell: (u32, u32),
    pub kind: CellKind,
    /// Whole block including its share of the road.
    pub block: Rect,
    /// Raised curb slab the buildings, park or parking sit on.
    pub curb: Rect,
}

/// All building volumes carved out of one building cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingBlock {
    pub cell: (u32, u32),
    /// Footprint before subdivision.
    pub footprint: Footprint,
    pub volumes: Vec<BuildingVolume>,
    /// See [`Subdivision::complete`].
    pub complete: bool,
}

/// Fully materialized output of one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityLayout {
    pub grid: Grid<CellKind>,
    /// Ground cells in grid scan order.
    pub lots: Vec<Lot>,
    /// Building cells in grid scan order.
    pub blocks: Vec<BuildingBlock>,
    /// Trees of all parks, in grid scan order.
    pub trees: Vec<TreePlacement>,
    /// City bounds on the ground plane.
    pub extent: Rect,
}

impl CityLayout {
    /// All building volumes, block by block.
    pub fn buildings(&self) -> impl Iterator<Item = &BuildingVolume> + '_ {
        self.blocks.iter().flat_map(|b| b.volumes.iter())
    }

    pub fn building_count(&self) -> usize {
        self.blocks.iter().map(|b| b.volumes.len()).sum()
    }

    /// Number of cells of each kind.
    pub fn kind_counts(&self) -> [(CellKind, usize); 4] {
        CellKind::ALL.map(|kind| (kind, self.grid.count(kind)))
    }
}

#[derive(Default)]
struct CellOutput {
    lot: Option<Lot>,
    block: Option<BuildingBlock>,
    trees: Vec<TreePlacement>,
}

/// Runs the pipeline for one validated configuration.
pub struct CityGenerator {
    config: CityConfig,
    rng: RngSeq,
    subdivider: BuildingSubdivider,
    scatterer: VegetationScatterer,
}

impl CityGenerator {
    /// Validate `config` and prepare the generator. Nothing is generated on error.
    pub fn new(config: CityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: RngSeq::new(config.seed),
            subdivider: BuildingSubdivider::new(SubdivisionParams::from_config(&config)),
            scatterer: VegetationScatterer::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    pub fn classifier(&self) -> GridClassifier {
        GridClassifier::new(self.config.ground_threshold, self.config.park_threshold)
            .with_open_space_limit(self.config.open_space_building_limit)
    }

    /// Sample noise and classify the whole grid.
    pub fn classify(&self) -> Grid<CellKind> {
        let n = self.config.grid_size;
        let sampler = NoiseFieldSampler::new(self.rng.noise_seed());
        let general = sampler.sample(n, self.config.general_noise_frequency);
        let ground = sampler.sample(n, self.config.ground_noise_frequency);
        self.classifier().classify(&general, &ground)
    }

    /// Generate the full city.
    pub fn generate(&self) -> CityLayout {
        let start = std::time::Instant::now();
        let layout = self.generate_from_grid(self.classify());

        log::info!(
            "Generated {}x{} city (seed {}): {} blocks, {} buildings, {} trees in {:.1}ms",
            layout.grid.size(), layout.grid.size(), self.config.seed,
            layout.blocks.len(), layout.building_count(), layout.trees.len(),
            start.elapsed().as_secs_f64() * 1000.0,
        );
        layout
    }

    /// Run the per-cell phase on an already classified grid.
    ///
    /// Cells are processed in parallel, each from its own seeded stream, and
    /// merged back in scan order, so the result does not depend on thread count.
    pub fn generate_from_grid(&self, grid: Grid<CellKind>) -> CityLayout {
        let n = grid.size();
        let cell_count = n as usize * n as usize;

        let outputs: Vec<CellOutput> = (0..cell_count)
            .into_par_iter()
            .map(|index| self.generate_cell(&grid, index))
            .collect();

        let mut lots = Vec::new();
        let mut blocks = Vec::new();
        let mut trees = Vec::new();
        for out in outputs {
            lots.extend(out.lot);
            blocks.extend(out.block);
            trees.extend(out.trees);
        }
        log::debug!("Merged {} lots, {} blocks, {} trees", lots.len(), blocks.len(), trees.len());

        let half_city = self.config.city_width_for(n) / 2.0;
        CityLayout {
            grid,
            lots,
            blocks,
            trees,
            extent: Rect::new(Vec2::splat(-half_city), Vec2::splat(half_city)),
        }
    }

    fn generate_cell(&self, grid: &Grid<CellKind>, index: usize) -> CellOutput {
        let (i, j) = grid.coords(index);
        let kind = grid.values()[index];
        let center = self.config.cell_center(grid.size(), i, j);
        let side = self.config.building_footprint_side();
        let lot = Lot {
            cell: (i, j),
            kind,
            block: Rect::square(center, self.config.block_size),
            curb: Rect::square(center, self.config.curb_width()),
        };
        let mut rng = self.rng.for_cell(index);

        match kind {
            CellKind::Water => CellOutput::default(),
            CellKind::Building => {
                let footprint = self.subdivider.block_footprint(center, side, &mut rng);
                let Subdivision { volumes, complete } = self.subdivider.subdivide(footprint, &mut rng);
                CellOutput {
                    lot: Some(lot),
                    block: Some(BuildingBlock { cell: (i, j), footprint, volumes, complete }),
                    trees: Vec::new(),
                }
            }
            CellKind::Park => CellOutput {
                lot: Some(lot),
                block: None,
                trees: self.scatterer.scatter(center, side, &mut rng),
            },
            CellKind::Parking => CellOutput {
                lot: Some(lot),
                ..Default::default()
            },
        }
    }
}
