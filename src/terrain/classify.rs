//! Grid classification: water vs. ground, then building / park / parking.

use super::grid::{CellKind, Grid};
use super::noise_field::NoiseField;

/// Number of surrounding building cells at which an open lot becomes parking.
pub const DEFAULT_OPEN_SPACE_BUILDING_LIMIT: u32 = 5;

/// Labels every cell from the two normalized noise fields.
///
/// Thresholds are taken as given; range checks belong to the configuration
/// layer, so callers may pass out-of-range values to force a class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridClassifier {
    /// Cells with `general <= ground_threshold` are ground, the rest water.
    pub ground_threshold: f32,
    /// Ground cells with `ground > park_threshold` hold buildings.
    pub park_threshold: f32,
    /// Open cells with fewer building neighbors than this become parks.
    pub open_space_building_limit: u32,
}

impl GridClassifier {
    pub fn new(ground_threshold: f32, park_threshold: f32) -> Self {
        Self {
            ground_threshold,
            park_threshold,
            open_space_building_limit: DEFAULT_OPEN_SPACE_BUILDING_LIMIT,
        }
    }

    pub fn with_open_space_limit(mut self, limit: u32) -> Self {
        self.open_space_building_limit = limit;
        self
    }

    /// Terrain pass.
    pub fn ground_mask(&self, general: &NoiseField) -> Grid<bool> {
        Grid::from_fn(general.size(), |i, j| general.get(i, j) <= self.ground_threshold)
    }

    /// Land-use pass: building cells are ground cells above the park threshold.
    pub fn building_mask(&self, ground_mask: &Grid<bool>, ground: &NoiseField) -> Grid<bool> {
        Grid::from_fn(ground_mask.size(), |i, j| {
            *ground_mask.get(i, j) && ground.get(i, j) > self.park_threshold
        })
    }

    /// Classify the full grid. Both fields must share the same size.
    pub fn classify(&self, general: &NoiseField, ground: &NoiseField) -> Grid<CellKind> {
        debug_assert_eq!(general.size(), ground.size());

        let ground_mask = self.ground_mask(general);
        let buildings = self.building_mask(&ground_mask, ground);

        // Open-space pass reads the finished building mask, never partial output.
        let grid = Grid::from_fn(general.size(), |i, j| {
            if !*ground_mask.get(i, j) {
                CellKind::Water
            } else if *buildings.get(i, j) {
                CellKind::Building
            } else if surrounding_building_count(&buildings, i, j) < self.open_space_building_limit {
                CellKind::Park
            } else {
                CellKind::Parking
            }
        });

        log::debug!(
            "Classified {}x{} grid: {} water, {} building, {} park, {} parking",
            grid.size(), grid.size(),
            grid.count(CellKind::Water),
            grid.count(CellKind::Building),
            grid.count(CellKind::Park),
            grid.count(CellKind::Parking),
        );
        grid
    }
}

/// Building cells inside the clamped 3x3 window around `(i, j)`, center included.
pub fn surrounding_building_count(buildings: &Grid<bool>, i: u32, j: u32) -> u32 {
    buildings
        .neighborhood(i, j, 1)
        .filter(|&(ni, nj)| *buildings.get(ni, nj))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: u32, values: &[f32]) -> NoiseField {
        NoiseField::from_values(size, values).unwrap()
    }

    #[test]
    fn test_terrain_threshold_is_inclusive() {
        let general = field(2, &[0.5, 0.85, 0.851, 1.0]);
        let ground = field(2, &[1.0; 4]);
        let grid = GridClassifier::new(0.85, 0.2).classify(&general, &ground);
        assert_eq!(*grid.get(0, 0), CellKind::Building);
        assert_eq!(*grid.get(0, 1), CellKind::Building);
        assert_eq!(*grid.get(1, 0), CellKind::Water);
        assert_eq!(*grid.get(1, 1), CellKind::Water);
    }

    #[test]
    fn test_park_threshold_is_exclusive() {
        let general = field(1, &[0.0]);
        let at = GridClassifier::new(1.0, 0.2).classify(&general, &field(1, &[0.2]));
        assert_eq!(*at.get(0, 0), CellKind::Park);
        let above = GridClassifier::new(1.0, 0.2).classify(&general, &field(1, &[0.21]));
        assert_eq!(*above.get(0, 0), CellKind::Building);
    }

    #[test]
    fn test_forced_building_single_cell() {
        let general = field(1, &[0.0]);
        let ground = field(1, &[0.0]);
        let grid = GridClassifier::new(1.0, -1.0).classify(&general, &ground);
        assert_eq!(*grid.get(0, 0), CellKind::Building);
    }

    #[test]
    fn test_water_never_becomes_building() {
        let general = field(2, &[1.0; 4]);
        let ground = field(2, &[1.0; 4]);
        let grid = GridClassifier::new(0.5, 0.0).classify(&general, &ground);
        assert_eq!(grid.count(CellKind::Water), 4);
    }

    #[test]
    fn test_open_cell_surrounded_by_buildings_is_parking() {
        // 3x3 ground; center open, all 8 neighbors buildings.
        let general = field(3, &[0.0; 9]);
        let mut g = [0.9; 9];
        g[4] = 0.1;
        let grid = GridClassifier::new(0.85, 0.2).classify(&general, &field(3, &g));
        assert_eq!(*grid.get(1, 1), CellKind::Parking);
    }

    #[test]
    fn test_corner_cell_counts_at_most_three_buildings() {
        // Corner window has 4 cells, 3 of them buildings: below the limit of 5.
        let general = field(3, &[0.0; 9]);
        let mut g = [0.9; 9];
        g[0] = 0.1;
        let grid = GridClassifier::new(0.85, 0.2).classify(&general, &field(3, &g));
        assert_eq!(*grid.get(0, 0), CellKind::Park);
    }

    #[test]
    fn test_open_space_limit_boundary() {
        // Center open with exactly 5 building neighbors.
        let general = field(3, &[0.0; 9]);
        let g = [0.9, 0.9, 0.9, 0.9, 0.1, 0.9, 0.1, 0.1, 0.1];
        let ground = field(3, &g);
        let five = GridClassifier::new(1.0, 0.2).classify(&general, &ground);
        assert_eq!(*five.get(1, 1), CellKind::Parking);
        let six = GridClassifier::new(1.0, 0.2)
            .with_open_space_limit(6)
            .classify(&general, &ground);
        assert_eq!(*six.get(1, 1), CellKind::Park);
    }

    #[test]
    fn test_water_does_not_count_as_building() {
        let general = field(3, &[1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        let ground = field(3, &[0.9, 0.9, 0.9, 0.9, 0.1, 0.9, 0.9, 0.9, 0.9]);
        let grid = GridClassifier::new(0.5, 0.2).classify(&general, &ground);
        assert_eq!(*grid.get(1, 1), CellKind::Park);
        assert_eq!(grid.count(CellKind::Water), 8);
    }

    #[test]
    fn test_surrounding_count_interior_and_corner() {
        let all = Grid::filled(4, true);
        assert_eq!(surrounding_building_count(&all, 1, 1), 9);
        assert_eq!(surrounding_building_count(&all, 0, 0), 4);
        assert_eq!(surrounding_building_count(&all, 3, 3), 4);
    }

    #[test]
    fn test_classification_is_pure() {
        let sampler = crate::terrain::NoiseFieldSampler::new(4242);
        let general = sampler.sample(20, 15.0);
        let ground = sampler.sample(20, 8.0);
        let classifier = GridClassifier::new(0.85, 0.2);
        assert_eq!(classifier.classify(&general, &ground), classifier.classify(&general, &ground));
    }
}
