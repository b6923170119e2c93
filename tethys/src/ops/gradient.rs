//! Finite-difference gradient operators.
//!
//! All operators return `(d_col, d_row)`, i.e. the derivative along x
//! (columns) first and along y (rows) second, in units per pixel.

use super::convolution::BorderMode;
use crate::grid::Grid2;

/// Unnormalized 3×3 Sobel derivatives.
///
/// `d_col` uses the kernel `[-1 0 1; -2 0 2; -1 0 1]` and `d_row` its
/// transpose, so a ramp of slope 1 per pixel yields 8.
pub fn sobel(grid: &Grid2<f64>, border: BorderMode) -> (Grid2<f64>, Grid2<f64>) {
    let (rows, cols) = (grid.rows(), grid.cols());
    if grid.is_empty() {
        return (grid.clone(), grid.clone());
    }

    let at = |r: usize, dr: isize, c: usize, dc: isize| -> f64 {
        let rr = border.resolve(r as isize + dr, rows);
        let cc = border.resolve(c as isize + dc, cols);
        grid[(rr, cc)]
    };

    let d_col = Grid2::from_fn(rows, cols, |r, c| {
        (at(r, -1, c, 1) + 2.0 * at(r, 0, c, 1) + at(r, 1, c, 1))
            - (at(r, -1, c, -1) + 2.0 * at(r, 0, c, -1) + at(r, 1, c, -1))
    });
    let d_row = Grid2::from_fn(rows, cols, |r, c| {
        (at(r, 1, c, -1) + 2.0 * at(r, 1, c, 0) + at(r, 1, c, 1))
            - (at(r, -1, c, -1) + 2.0 * at(r, -1, c, 0) + at(r, -1, c, 1))
    });
    (d_col, d_row)
}

/// Second-order central differences in the interior, first-order one-sided
/// differences at the borders. An axis of length 1 has zero derivative.
pub fn central_difference(grid: &Grid2<f64>) -> (Grid2<f64>, Grid2<f64>) {
    let (rows, cols) = (grid.rows(), grid.cols());
    let d_col = Grid2::from_fn(rows, cols, |r, c| {
        axis_difference(c, cols, |i| grid[(r, i)])
    });
    let d_row = Grid2::from_fn(rows, cols, |r, c| {
        axis_difference(r, rows, |i| grid[(i, c)])
    });
    (d_col, d_row)
}

#[inline]
fn axis_difference(i: usize, len: usize, sample: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        0.0
    } else if i == 0 {
        sample(1) - sample(0)
    } else if i == len - 1 {
        sample(len - 1) - sample(len - 2)
    } else {
        (sample(i + 1) - sample(i - 1)) / 2.0
    }
}

/// Euclidean norm of a gradient pair.
pub fn magnitude(d_col: &Grid2<f64>, d_row: &Grid2<f64>) -> Grid2<f64> {
    d_col.zip_map(d_row, |x, y| x.hypot(*y))
}
