//! Separable convolution with explicit border handling.
//!
//! A row pass followed by a column pass is O(n×k) instead of O(n×k²) for
//! the equivalent 2D kernel. Rows are convolved in parallel chunks.

use rayon::prelude::*;

use crate::grid::Grid2;

/// Rows handed to one rayon task in the horizontal pass.
const ROWS_PER_CHUNK: usize = 8;

/// How samples outside the grid are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Mirror without repeating the edge sample: `c b | a b c | b a`.
    Reflect101,
    /// Repeat the edge sample: `a a | a b c | c c`.
    Nearest,
}

impl BorderMode {
    /// Map a possibly out-of-range index onto `0..len`. `len` must be > 0.
    #[inline]
    pub fn resolve(self, index: isize, len: usize) -> usize {
        debug_assert!(len > 0);
        let last = len as isize - 1;
        match self {
            Self::Nearest => index.clamp(0, last) as usize,
            Self::Reflect101 => {
                if last == 0 {
                    return 0;
                }
                let period = 2 * last;
                let m = index.rem_euclid(period);
                (if m > last { period - m } else { m }) as usize
            }
        }
    }
}

/// Normalized 1D Gaussian kernel of radius `round(truncate * sigma)`.
///
/// Returns `[1.0]` when the radius rounds down to zero.
pub fn gaussian_kernel_1d(sigma: f64, truncate: f64) -> Vec<f64> {
    assert!(sigma > 0.0, "Sigma must be positive");

    let radius = (truncate * sigma + 0.5) as usize;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Gaussian smoothing with the given sigma (pixels), truncated at
/// `truncate` sigmas.
pub fn gaussian_blur(grid: &Grid2<f64>, sigma: f64, truncate: f64, border: BorderMode) -> Grid2<f64> {
    let kernel = gaussian_kernel_1d(sigma, truncate);
    convolve_separable(grid, &kernel, border)
}

/// Convolve rows and then columns with the same odd-length kernel.
pub fn convolve_separable(grid: &Grid2<f64>, kernel: &[f64], border: BorderMode) -> Grid2<f64> {
    assert!(kernel.len() % 2 == 1, "Kernel length must be odd");
    let (rows, cols) = (grid.rows(), grid.cols());
    if grid.is_empty() {
        return grid.clone();
    }
    let radius = (kernel.len() / 2) as isize;

    let mut temp = Grid2::new_filled(rows, cols, 0.0);
    temp.cells_mut()
        .par_chunks_mut(cols * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            for (local_row, out_row) in out_chunk.chunks_mut(cols).enumerate() {
                let in_row = grid.row(chunk_idx * ROWS_PER_CHUNK + local_row);
                for (col, out) in out_row.iter_mut().enumerate() {
                    *out = kernel
                        .iter()
                        .enumerate()
                        .map(|(k, w)| {
                            let src = border.resolve(col as isize + k as isize - radius, cols);
                            w * in_row[src]
                        })
                        .sum();
                }
            }
        });

    Grid2::from_fn(rows, cols, |row, col| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let src = border.resolve(row as isize + k as isize - radius, rows);
                w * temp[(src, col)]
            })
            .sum()
    })
}

/// 5×5 binomial blur (`[1, 4, 6, 4, 1] / 16` per axis) on 8-bit data with
/// reflect-101 borders. Rounds to nearest after the full 2D pass.
pub fn binomial_blur_5x5(grid: &Grid2<u8>) -> Grid2<u8> {
    const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];
    let (rows, cols) = (grid.rows(), grid.cols());
    if grid.is_empty() {
        return grid.clone();
    }
    let border = BorderMode::Reflect101;

    let horizontal = Grid2::from_fn(rows, cols, |row, col| {
        KERNEL
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let src = border.resolve(col as isize + k as isize - 2, cols);
                w * u32::from(grid[(row, src)])
            })
            .sum::<u32>()
    });

    Grid2::from_fn(rows, cols, |row, col| {
        let sum: u32 = KERNEL
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let src = border.resolve(row as isize + k as isize - 2, rows);
                w * horizontal[(src, col)]
            })
            .sum();
        // sum <= 255 * 256, so the rounded quotient fits in u8
        ((sum + 128) >> 8) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect101_resolve() {
        let b = BorderMode::Reflect101;
        assert_eq!(b.resolve(-1, 5), 1);
        assert_eq!(b.resolve(-2, 5), 2);
        assert_eq!(b.resolve(5, 5), 3);
        assert_eq!(b.resolve(6, 5), 2);
        assert_eq!(b.resolve(2, 5), 2);
        // Repeated reflection on a short axis
        assert_eq!(b.resolve(-3, 2), 1);
        assert_eq!(b.resolve(4, 2), 0);
        assert_eq!(b.resolve(-7, 1), 0);
    }

    #[test]
    fn test_nearest_resolve() {
        let b = BorderMode::Nearest;
        assert_eq!(b.resolve(-4, 3), 0);
        assert_eq!(b.resolve(9, 3), 2);
        assert_eq!(b.resolve(1, 3), 1);
    }

    #[test]
    fn test_gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(2.0, 4.0);
        assert_eq!(kernel.len(), 17);
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
        assert!(kernel[8] > kernel[7]);
    }

    #[test]
    fn test_gaussian_blur_preserves_constant() {
        let grid = Grid2::new_filled(20, 11, 3.5);
        let out = gaussian_blur(&grid, 2.0, 4.0, BorderMode::Nearest);
        assert!(out.iter().all(|v| (v - 3.5).abs() < 1e-12));
    }

    #[test]
    fn test_gaussian_blur_spreads_impulse() {
        let mut grid = Grid2::new_filled(21, 21, 0.0);
        grid[(10, 10)] = 1.0;
        let out = gaussian_blur(&grid, 1.5, 4.0, BorderMode::Nearest);
        let total: f64 = out.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(out[(10, 10)] < 1.0);
        assert!((out[(10, 9)] - out[(9, 10)]).abs() < 1e-15);
    }

    #[test]
    fn test_binomial_blur_constant_and_step() {
        let flat = Grid2::new_filled(6, 7, 200u8);
        assert!(binomial_blur_5x5(&flat).iter().all(|&v| v == 200));

        // Vertical step: columns 0..4 are 0, columns 4.. are 255.
        let step = Grid2::from_fn(5, 8, |_, c| if c < 4 { 0u8 } else { 255 });
        let out = binomial_blur_5x5(&step);
        // Column 3 sees weights 1 + 4 out of 16 on the bright side.
        assert_eq!(out[(2, 3)], ((255 * 5 * 16 + 128) >> 8) as u8);
        assert_eq!(out[(2, 0)], 0);
        assert_eq!(out[(2, 7)], 255);
    }
}
