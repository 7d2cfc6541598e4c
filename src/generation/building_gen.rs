//! Building subdivision — recursively carves a block footprint into
//! individual building volumes with jittered heights.
//!
//! A footprint either becomes a single volume (it is already tall, or the
//! depth budget is spent) or is cut in two along its longer side. The cut
//! line is offset by a random slice deviation so siblings come out unequal.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::CityConfig;

/// Smallest width/depth a split child may shrink to.
pub const MIN_FOOTPRINT_SIZE: f32 = 1.0;

/// Which footprint dimension a split halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Cut across X; children keep the depth.
    Width,
    /// Cut across Z; children keep the width.
    Depth,
}

/// Plan-view rectangle with a target height, the unit of subdivision work.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// World-space (x, z) center.
    pub center: Vec2,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Footprint {
    pub fn new(center: Vec2, width: f32, depth: f32, height: f32) -> Self {
        Self { center, width, depth, height }
    }

    /// The longer side is split; ties split the depth.
    pub fn split_axis(&self) -> SplitAxis {
        if self.width <= self.depth {
            SplitAxis::Depth
        } else {
            SplitAxis::Width
        }
    }

    /// Cut into two children along `axis`.
    ///
    /// Child extents are `|e/2 - slice| - margin/2` and `|-e/2 - slice| - margin/2`
    /// (clamped to [`MIN_FOOTPRINT_SIZE`]); their centers sit at
    /// `slice/2 ± (e/4 + margin/4)` from the parent center. Height and the
    /// other extent are inherited.
    pub fn split(&self, axis: SplitAxis, slice: f32, margin: f32) -> (Footprint, Footprint) {
        match axis {
            SplitAxis::Depth => {
                let (a, b) = split_extents(self.depth, slice);
                let (oa, ob) = split_offsets(self.depth, slice, margin);
                (
                    Footprint {
                        center: self.center + Vec2::new(0.0, oa),
                        depth: shrink(a, margin),
                        ..*self
                    },
                    Footprint {
                        center: self.center + Vec2::new(0.0, ob),
                        depth: shrink(b, margin),
                        ..*self
                    },
                )
            }
            SplitAxis::Width => {
                let (a, b) = split_extents(self.width, slice);
                let (oa, ob) = split_offsets(self.width, slice, margin);
                (
                    Footprint {
                        center: self.center + Vec2::new(oa, 0.0),
                        width: shrink(a, margin),
                        ..*self
                    },
                    Footprint {
                        center: self.center + Vec2::new(ob, 0.0),
                        width: shrink(b, margin),
                        ..*self
                    },
                )
            }
        }
    }
}

/// Child extents of a split before the margin is removed.
///
/// They sum to `extent` whenever `slice <= extent / 2`.
pub fn split_extents(extent: f32, slice: f32) -> (f32, f32) {
    ((extent / 2.0 - slice).abs(), (-extent / 2.0 - slice).abs())
}

fn split_offsets(extent: f32, slice: f32, margin: f32) -> (f32, f32) {
    let spread = extent / 4.0 + margin / 4.0;
    (slice / 2.0 + spread, slice / 2.0 - spread)
}

fn shrink(extent: f32, margin: f32) -> f32 {
    let shrunk = extent - margin / 2.0;
    if shrunk < MIN_FOOTPRINT_SIZE {
        log::trace!("Clamping split extent {} to {}", shrunk, MIN_FOOTPRINT_SIZE);
        MIN_FOOTPRINT_SIZE
    } else {
        shrunk
    }
}

/// Final, never-split building box handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingVolume {
    /// Box center; `y` puts the base on top of the curb.
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    /// Whether the final height passes the tall cutoff (facade class hint).
    pub tall: bool,
}

/// Output of subdividing one block footprint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subdivision {
    /// Volumes in emission order (depth-first, first child before second).
    pub volumes: Vec<BuildingVolume>,
    /// Raised once `2^D` volumes exist or a tall volume was emitted; the
    /// group can then be handed off as one batch.
    pub complete: bool,
}

/// Numeric knobs of the subdivision algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubdivisionParams {
    pub min_height: f32,
    pub max_height: f32,
    pub max_height_deviation: f32,
    pub max_slice_deviation: f32,
    /// Percentage of `max_height`.
    pub tall_percentage_cutoff: f32,
    /// Gap kept between split siblings.
    pub margin: f32,
    /// Elevation of the volume base (curb top).
    pub base_elevation: f32,
    /// Recursion depth budget D.
    pub max_subdivisions: u32,
}

impl SubdivisionParams {
    pub fn from_config(config: &CityConfig) -> Self {
        Self {
            min_height: config.min_building_height,
            max_height: config.max_building_height,
            max_height_deviation: config.max_building_height_deviation,
            max_slice_deviation: config.max_building_slice_deviation,
            tall_percentage_cutoff: config.tall_percentage_cutoff,
            margin: config.block_margin,
            base_elevation: config.curb_height,
            max_subdivisions: config.block_subdivisions,
        }
    }

    /// `round(height / max_height * 100) >= cutoff`.
    pub fn is_tall(&self, height: f32) -> bool {
        (height / self.max_height * 100.0).round() >= self.tall_percentage_cutoff
    }
}

/// Upper bound on volumes from a depth budget of `depth`.
pub fn max_volume_count(depth: u32) -> usize {
    1usize.checked_shl(depth).unwrap_or(usize::MAX)
}

pub struct BuildingSubdivider {
    params: SubdivisionParams,
}

impl BuildingSubdivider {
    pub fn new(params: SubdivisionParams) -> Self {
        Self { params }
    }

    /// Initial footprint of a building block centered at `center`, with a base
    /// height drawn from the configured building height range.
    pub fn block_footprint<R: Rng + ?Sized>(&self, center: Vec2, side: f32, rng: &mut R) -> Footprint {
        let height = rng.gen_range(self.params.min_height..=self.params.max_height);
        Footprint::new(center, side, side, height)
    }

    /// Subdivide with the configured depth budget.
    pub fn subdivide<R: Rng + ?Sized>(&self, footprint: Footprint, rng: &mut R) -> Subdivision {
        self.subdivide_to_depth(footprint, self.params.max_subdivisions, rng)
    }

    /// Subdivide with an explicit depth budget. Yields between 1 and `2^depth` volumes.
    pub fn subdivide_to_depth<R: Rng + ?Sized>(
        &self,
        footprint: Footprint,
        depth: u32,
        rng: &mut R,
    ) -> Subdivision {
        let mut out = Subdivision::default();
        let target = max_volume_count(depth);
        self.subdivide_into(footprint, depth, target, rng, &mut out);
        out
    }

    fn subdivide_into<R: Rng + ?Sized>(
        &self,
        footprint: Footprint,
        remaining: u32,
        target: usize,
        rng: &mut R,
        out: &mut Subdivision,
    ) {
        if remaining < 1 || self.params.is_tall(footprint.height) {
            let volume = self.emit(&footprint, rng);
            out.volumes.push(volume);
            if out.volumes.len() >= target || volume.tall {
                out.complete = true;
            }
            return;
        }

        let axis = footprint.split_axis();
        let slice = rng.gen_range(0.0..=self.params.max_slice_deviation);
        let (first, second) = footprint.split(axis, slice, self.params.margin);

        self.subdivide_into(first, remaining - 1, target, rng, out);
        self.subdivide_into(second, remaining - 1, target, rng, out);
    }

    /// Terminal case: jitter the height and lift the box onto the curb.
    fn emit<R: Rng + ?Sized>(&self, footprint: &Footprint, rng: &mut R) -> BuildingVolume {
        let deviation = rng.gen_range(0.0..=self.params.max_height_deviation);
        let jittered = rng.gen_range((footprint.height - deviation)..=(footprint.height + deviation));
        let height = jittered.clamp(self.params.min_height, self.params.max_height);

        BuildingVolume {
            position: Vec3::new(
                footprint.center.x,
                height / 2.0 + self.params.base_elevation,
                footprint.center.y,
            ),
            width: footprint.width,
            depth: footprint.depth,
            height,
            tall: self.params.is_tall(height),
        }
    }
}
