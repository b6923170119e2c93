//! Dual-threshold edge operator (Canny) on 8-bit images.

use crate::grid::Grid2;
use crate::ops::convolution::BorderMode;
use crate::ops::gradient::sobel;

/// tan(22.5°) in Q15 fixed point.
const TG22: i64 = 13573;

/// Classify gradient direction into the horizontal, vertical or one of the
/// two diagonal sectors, comparing against the two neighbors along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sector {
    Horizontal,
    Vertical,
    /// +1 when the gradient points toward the lower-right/upper-left
    /// diagonal, -1 for the lower-left/upper-right one.
    Diagonal(isize),
}

impl Sector {
    fn classify(dx: i64, dy: i64) -> Self {
        let x = dx.abs();
        let y = dy.abs() << 15;
        let tg22x = x * TG22;
        if y < tg22x {
            return Self::Horizontal;
        }
        let tg67x = tg22x + (x << 16);
        if y > tg67x {
            Self::Vertical
        } else if (dx < 0) != (dy < 0) {
            Self::Diagonal(-1)
        } else {
            Self::Diagonal(1)
        }
    }
}

/// Edge map of `image` with hysteresis thresholds on the L1 Sobel magnitude.
///
/// A pixel is an edge candidate when it is a local maximum across its
/// gradient direction and its magnitude exceeds `low`; candidates above
/// `high` seed the edges, and every candidate 8-connected to a seed through
/// other candidates is an edge too. Thresholds are swapped if given in the
/// wrong order. Magnitude outside the image counts as zero.
pub fn canny(image: &Grid2<u8>, low: f64, high: f64) -> Grid2<bool> {
    let (rows, cols) = (image.rows(), image.cols());
    if image.is_empty() {
        return Grid2::new_filled(rows, cols, false);
    }

    let (mut low, mut high) = (low.floor() as i64, high.floor() as i64);
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }

    let samples = image.map(|&v| f64::from(v));
    let (gx, gy) = sobel(&samples, BorderMode::Nearest);
    let dx = gx.map(|&v| v as i64);
    let dy = gy.map(|&v| v as i64);
    let magnitude = dx.zip_map(&dy, |x, y| x.abs() + y.abs());

    let mag_at = |r: isize, c: isize| -> i64 { magnitude.get_signed(r, c).copied().unwrap_or(0) };

    let mut candidate = Grid2::new_filled(rows, cols, false);
    let mut seeds: Vec<(usize, usize)> = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            let m = magnitude[(row, col)];
            if m <= low {
                continue;
            }
            let (r, c) = (row as isize, col as isize);
            let is_peak = match Sector::classify(dx[(row, col)], dy[(row, col)]) {
                Sector::Horizontal => m > mag_at(r, c - 1) && m >= mag_at(r, c + 1),
                Sector::Vertical => m > mag_at(r - 1, c) && m >= mag_at(r + 1, c),
                Sector::Diagonal(s) => m > mag_at(r - 1, c - s) && m > mag_at(r + 1, c + s),
            };
            if !is_peak {
                continue;
            }
            candidate[(row, col)] = true;
            if m > high {
                seeds.push((row, col));
            }
        }
    }

    let mut edges = Grid2::new_filled(rows, cols, false);
    for &(row, col) in &seeds {
        edges[(row, col)] = true;
    }
    while let Some((row, col)) = seeds.pop() {
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                let (r, c) = (row as isize + dr, col as isize + dc);
                if candidate.get_signed(r, c) != Some(&true) {
                    continue;
                }
                let (r, c) = (r as usize, c as usize);
                if !edges[(r, c)] {
                    edges[(r, c)] = true;
                    seeds.push((r, c));
                }
            }
        }
    }

    tracing::trace!(
        candidates = candidate.count_set(),
        edges = edges.count_set(),
        "Edge operator finished"
    );
    edges
}
