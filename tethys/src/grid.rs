//! Row-major 2D grid addressed by `(row, col)`.
//!
//! Rows run along latitude and columns along longitude, matching the layout
//! of [`crate::ScalarField`] values.

use std::ops::{Index, IndexMut};
use std::slice;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid2<T> {
    cells: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Grid2<T> {
    pub fn new(rows: usize, cols: usize, cells: Vec<T>) -> Self {
        assert_eq!(
            cells.len(),
            rows * cols,
            "cells length must equal rows * cols"
        );
        Self { cells, rows, cols }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }
        Self { cells, rows, cols }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checked access with signed indices; `None` outside the grid.
    #[inline]
    pub fn get_signed(&self, row: isize, col: isize) -> Option<&T> {
        if self.contains(row, col) {
            Some(&self.cells[row as usize * self.cols + col as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.cells.iter()
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid2<U> {
        Grid2 {
            cells: self.cells.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Combine two grids of identical shape cell by cell.
    pub fn zip_map<U, V>(&self, other: &Grid2<U>, mut f: impl FnMut(&T, &U) -> V) -> Grid2<V> {
        assert_eq!(self.rows, other.rows, "row count mismatch");
        assert_eq!(self.cols, other.cols, "col count mismatch");
        Grid2 {
            cells: self
                .cells
                .iter()
                .zip(other.cells.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Clone> Grid2<T> {
    pub fn new_filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            cells: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl Grid2<f64> {
    /// Largest finite cell value, `None` if no cell is finite.
    pub fn max_finite(&self) -> Option<f64> {
        self.cells
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Smallest finite cell value, `None` if no cell is finite.
    pub fn min_finite(&self) -> Option<f64> {
        self.cells
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
    }

    /// Arithmetic mean over all cells, `None` for an empty grid.
    pub fn mean(&self) -> Option<f64> {
        if self.cells.is_empty() {
            return None;
        }
        Some(self.cells.iter().sum::<f64>() / self.cells.len() as f64)
    }

    /// Population standard deviation over all cells, `None` for an empty grid.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var = self
            .cells
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.cells.len() as f64;
        Some(var.sqrt())
    }
}

impl Grid2<bool> {
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }
}

impl<T> Index<(usize, usize)> for Grid2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.cells[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid2<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.cells[row * self.cols + col]
    }
}

impl<'a, T> IntoIterator for &'a Grid2<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_dimensions() {
        let grid = Grid2::new(2, 3, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.len(), 6);
        assert!(!grid.is_empty());
    }

    #[test]
    #[should_panic(expected = "cells length must equal rows * cols")]
    fn test_new_panics_on_size_mismatch() {
        Grid2::new(2, 3, vec![1, 2, 3]);
    }

    #[test]
    fn test_row_col_addressing() {
        // row 0 = [1, 2, 3], row 1 = [4, 5, 6]
        let grid = Grid2::new(2, 3, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(grid[(0, 2)], 3);
        assert_eq!(grid[(1, 0)], 4);
        assert_eq!(grid[(1, 2)], 6);
        assert_eq!(grid.row(1), &[4, 5, 6]);
    }

    #[test]
    fn test_get_signed_outside_is_none() {
        let grid = Grid2::new(2, 2, vec![1, 2, 3, 4]);
        assert_eq!(grid.get_signed(-1, 0), None);
        assert_eq!(grid.get_signed(0, 2), None);
        assert_eq!(grid.get_signed(1, 1), Some(&4));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid2::from_fn(2, 2, |r, c| r * 10 + c);
        assert_eq!(grid.cells(), &[0, 1, 10, 11]);
    }

    #[test]
    fn test_zip_map() {
        let a = Grid2::new(1, 3, vec![1.0, 2.0, 3.0]);
        let b = Grid2::new(1, 3, vec![10.0, 20.0, 30.0]);
        let sum = a.zip_map(&b, |x, y| x + y);
        assert_eq!(sum.cells(), &[11.0, 22.0, 33.0]);
    }

    #[test]
    fn test_statistics() {
        let grid = Grid2::new(2, 2, vec![1.0, 3.0, 1.0, 3.0]);
        assert_eq!(grid.mean(), Some(2.0));
        assert_eq!(grid.std_dev(), Some(1.0));
        assert_eq!(grid.max_finite(), Some(3.0));
        assert_eq!(grid.min_finite(), Some(1.0));
    }

    #[test]
    fn test_finite_extrema_skip_nan() {
        let grid = Grid2::new(1, 3, vec![f64::NAN, 2.0, -1.0]);
        assert_eq!(grid.max_finite(), Some(2.0));
        assert_eq!(grid.min_finite(), Some(-1.0));

        let empty: Grid2<f64> = Grid2::new(0, 0, vec![]);
        assert_eq!(empty.max_finite(), None);
        assert_eq!(empty.mean(), None);
    }
}
