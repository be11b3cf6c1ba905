//! Row-major 2D grid shared by every pipeline stage.

use serde::{Deserialize, Serialize};

/// Offsets of the 8 surrounding cells (Moore neighborhood).
const NEIGHBOR_OFFSETS_8: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Offsets of the 4 cardinal neighbors.
const NEIGHBOR_OFFSETS_4: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A `width × height` grid of cells stored in row-major order.
///
/// Cells are filled left-to-right, top-to-bottom. Every cell always holds a
/// value; there are no holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![value; size],
        }
    }
}

impl<T> Grid<T> {
    /// Creates a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> T,
    {
        let size = (width as usize) * (height as usize);
        let mut cells = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self { width, height, cells }
    }

    /// Wraps an existing row-major buffer. Returns `None` if the length does
    /// not match `width * height`.
    pub fn from_vec(width: u32, height: u32, cells: Vec<T>) -> Option<Self> {
        if cells.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true if both grids have the same dimensions.
    pub fn same_dimensions<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Returns true if the signed coordinate lies inside the grid.
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Returns the cell at the given coordinate.
    ///
    /// # Panics
    /// Panics if x or y is out of bounds.
    pub fn get(&self, x: u32, y: u32) -> &T {
        &self.cells[self.index(x, y)]
    }

    /// Returns the cell at a signed coordinate, or `None` outside the grid.
    pub fn try_get(&self, x: i64, y: i64) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as u32, y as u32))
        } else {
            None
        }
    }

    /// Sets the cell at the given coordinate.
    ///
    /// # Panics
    /// Panics if x or y is out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let i = self.index(x, y);
        self.cells[i] = value;
    }

    /// Raw row-major cell slice.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Returns an iterator over all (x, y) coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }

    /// Returns an iterator over `(x, y, &cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        let w = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i as u32) % w, (i as u32) / w, c))
    }

    /// In-bounds 8-connected neighbors of `(x, y)`.
    pub fn neighbors_8(&self, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.offset_neighbors(x, y, &NEIGHBOR_OFFSETS_8)
    }

    /// In-bounds 4-connected neighbors of `(x, y)`.
    pub fn neighbors_4(&self, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.offset_neighbors(x, y, &NEIGHBOR_OFFSETS_4)
    }

    fn offset_neighbors<'a>(
        &'a self,
        x: u32,
        y: u32,
        offsets: &'static [(i64, i64)],
    ) -> impl Iterator<Item = (u32, u32)> + 'a {
        offsets.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            self.in_bounds(nx, ny).then_some((nx as u32, ny as u32))
        })
    }

    /// Builds a new grid of the same dimensions by mapping every cell.
    pub fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|c| f(c)).collect(),
        }
    }

    /// Like [`Grid::map`] but also passes the cell coordinate.
    pub fn map_with_coords<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(u32, u32, &T) -> U,
    {
        let cells = self.iter().map(|(x, y, c)| f(x, y, c)).collect();
        Grid {
            width: self.width,
            height: self.height,
            cells,
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Nearest-neighbour resample to `width × height`.
    ///
    /// Returns `None` when resampling a non-empty target from an empty grid.
    pub fn resample_nearest(&self, width: u32, height: u32) -> Option<Grid<T>> {
        if (width, height) == self.dimensions() {
            return Some(self.clone());
        }
        if self.is_empty() && width > 0 && height > 0 {
            return None;
        }
        let (sw, sh) = (self.width as u64, self.height as u64);
        Some(Grid::from_fn(width, height, |x, y| {
            let sx = (x as u64 * sw / width as u64) as u32;
            let sy = (y as u64 * sh / height as u64) as u32;
            self.get(sx, sy).clone()
        }))
    }
}

impl Grid<f32> {
    /// Returns the (min, max) value range, or `(0.0, 0.0)` for an empty grid.
    pub fn value_range(&self) -> (f32, f32) {
        if self.cells.is_empty() {
            return (0.0, 0.0);
        }
        let min = self.cells.iter().cloned().fold(f32::MAX, f32::min);
        let max = self.cells.iter().cloned().fold(f32::MIN, f32::max);
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::filled(4, 3, 0u8);
        assert_eq!(grid.dimensions(), (4, 3));
        assert_eq!(grid.len(), 12);
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_get_set() {
        let mut grid = Grid::filled(8, 8, 0.0f32);
        grid.set(3, 5, 0.75);
        assert_eq!(*grid.get(3, 5), 0.75);
        assert_eq!(grid.try_get(3, 5), Some(&0.75));
        assert_eq!(grid.try_get(-1, 0), None);
        assert_eq!(grid.try_get(8, 0), None);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid::from_fn(3, 2, |x, y| (x, y));
        assert_eq!(grid.cells()[0], (0, 0));
        assert_eq!(grid.cells()[1], (1, 0));
        assert_eq!(grid.cells()[3], (0, 1));
        assert_eq!(*grid.get(2, 1), (2, 1));
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3]).is_none());
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3, 4]).is_some());
    }

    #[test]
    fn test_coords_iterator() {
        let grid = Grid::filled(4, 4, ());
        let coords: Vec<_> = grid.coords().collect();

        assert_eq!(coords.len(), 16);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (1, 0));
        assert_eq!(coords[4], (0, 1));
        assert_eq!(coords[15], (3, 3));
    }

    #[test]
    fn corner_and_interior_neighbor_counts() {
        let grid = Grid::filled(5, 5, 0u8);
        assert_eq!(grid.neighbors_8(0, 0).count(), 3);
        assert_eq!(grid.neighbors_8(2, 0).count(), 5);
        assert_eq!(grid.neighbors_8(2, 2).count(), 8);
        assert_eq!(grid.neighbors_4(0, 0).count(), 2);
        assert_eq!(grid.neighbors_4(2, 2).count(), 4);
    }

    #[test]
    fn resample_nearest_scales_both_ways() {
        let grid = Grid::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let up = grid.resample_nearest(4, 4).unwrap();
        assert_eq!(up.dimensions(), (4, 4));
        assert_eq!(*up.get(0, 0), 1);
        assert_eq!(*up.get(3, 0), 2);
        assert_eq!(*up.get(0, 3), 3);
        assert_eq!(*up.get(3, 3), 4);

        let down = up.resample_nearest(2, 2).unwrap();
        assert_eq!(down, grid);

        let empty: Grid<u8> = Grid::filled(0, 0, 0);
        assert!(empty.resample_nearest(2, 2).is_none());
    }

    #[test]
    fn test_value_range_and_map() {
        let mut grid = Grid::filled(4, 4, 0.5f32);
        grid.set(0, 0, 0.1);
        grid.set(3, 3, 0.9);
        assert_eq!(grid.value_range(), (0.1, 0.9));

        let doubled = grid.map(|v| v * 2.0);
        assert!(doubled.same_dimensions(&grid));
        assert!((*doubled.get(3, 3) - 1.8).abs() < 1e-6);
    }
}
