//! Dense square grid storage and the cell classification enum

use serde::{Deserialize, Serialize};

/// Land-use class assigned to a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Water,
    Park,
    Parking,
    Building,
}

impl CellKind {
    /// Every class except water sits on a street-level ground slab.
    pub fn is_ground(self) -> bool {
        !matches!(self, CellKind::Water)
    }

    pub const ALL: [CellKind; 4] = [
        CellKind::Water,
        CellKind::Park,
        CellKind::Parking,
        CellKind::Building,
    ];
}

/// N x N row-major grid addressed by `(i, j)`, `i` being the outer (X) axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    size: u32,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(size: u32) -> Self {
        Self::filled(size, T::default())
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(size: u32, value: T) -> Self {
        let n = size as usize;
        Self { size, data: vec![value; n * n] }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(i, j)` in scan order (i outer, j inner).
    pub fn from_fn(size: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(size as usize * size as usize);
        for i in 0..size {
            for j in 0..size {
                data.push(f(i, j));
            }
        }
        Self { size, data }
    }

    /// Cells per side.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn index(&self, i: u32, j: u32) -> usize {
        i as usize * self.size as usize + j as usize
    }

    /// Inverse of [`Grid::index`].
    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let n = self.size as usize;
        ((index / n) as u32, (index % n) as u32)
    }

    #[inline]
    pub fn get(&self, i: u32, j: u32) -> &T {
        &self.data[self.index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: u32, j: u32, v: T) {
        let idx = self.index(i, j);
        self.data[idx] = v;
    }

    /// Values in scan order.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// `((i, j), value)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, v)| (self.coords(idx), v))
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            size: self.size,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Cells of the clamped square neighborhood of `radius` around `(i, j)`,
    /// the center cell included. Border cells get a truncated window; nothing
    /// outside the grid is ever yielded.
    pub fn neighborhood(&self, i: u32, j: u32, radius: u32) -> impl Iterator<Item = (u32, u32)> {
        let last = self.size.saturating_sub(1);
        let i_lo = i.saturating_sub(radius);
        let i_hi = (i + radius).min(last);
        let j_lo = j.saturating_sub(radius);
        let j_hi = (j + radius).min(last);
        (i_lo..=i_hi).flat_map(move |ni| (j_lo..=j_hi).map(move |nj| (ni, nj)))
    }
}

impl Grid<CellKind> {
    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.data.iter().filter(|&&k| k == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_scan_order() {
        let grid = Grid::from_fn(4, |i, j| i * 10 + j);
        assert_eq!(*grid.get(2, 3), 23);
        assert_eq!(grid.index(2, 3), 11);
        assert_eq!(grid.coords(11), (2, 3));
        assert_eq!(grid.values()[0..4], [0, 1, 2, 3]);
    }

    #[test]
    fn test_neighborhood_interior_has_nine_cells() {
        let grid: Grid<u8> = Grid::new(5);
        assert_eq!(grid.neighborhood(2, 2, 1).count(), 9);
    }

    #[test]
    fn test_neighborhood_corner_has_four_cells() {
        let grid: Grid<u8> = Grid::new(5);
        assert_eq!(grid.neighborhood(0, 0, 1).count(), 4);
        assert_eq!(grid.neighborhood(4, 4, 1).count(), 4);
        assert_eq!(grid.neighborhood(0, 4, 1).count(), 4);
    }

    #[test]
    fn test_neighborhood_edge_has_six_cells() {
        let grid: Grid<u8> = Grid::new(5);
        assert_eq!(grid.neighborhood(0, 2, 1).count(), 6);
    }

    #[test]
    fn test_neighborhood_single_cell_grid() {
        let grid: Grid<u8> = Grid::new(1);
        let cells: Vec<_> = grid.neighborhood(0, 0, 1).collect();
        assert_eq!(cells, vec![(0, 0)]);
    }

    #[test]
    fn test_count_kinds() {
        let mut grid = Grid::filled(3, CellKind::Water);
        grid.set(1, 1, CellKind::Building);
        grid.set(0, 1, CellKind::Park);
        assert_eq!(grid.count(CellKind::Water), 7);
        assert_eq!(grid.count(CellKind::Building), 1);
        assert!(CellKind::Park.is_ground());
        assert!(!CellKind::Water.is_ground());
    }
}
