//! Outer border following on binary maps.

use glam::DVec2;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};

use crate::grid::Grid2;

/// Background frame width around the traced mask.
const PAD: u32 = 1;

/// Outermost borders of the set pixels in `mask`, one closed pixel chain
/// per top-level component. Borders of holes and of components nested in
/// holes are skipped.
///
/// Points are pixel centers as `DVec2 { x: col, y: row }`; the chain is
/// implicitly closed (the first point is not repeated). Everything outside
/// the grid counts as background, so components touching the border are
/// traced like any other.
pub fn external_contours(mask: &Grid2<bool>) -> Vec<Vec<DVec2>> {
    if mask.is_empty() {
        return Vec::new();
    }

    // Border following never starts an outer border in column 0, so the
    // mask is traced inside a one pixel frame of background.
    let image = GrayImage::from_fn(
        mask.cols() as u32 + 2 * PAD,
        mask.rows() as u32 + 2 * PAD,
        |x, y| {
            let inside = x >= PAD
                && y >= PAD
                && mask
                    .get_signed((y - PAD) as isize, (x - PAD) as isize)
                    .copied()
                    .unwrap_or(false);
            Luma([if inside { 255 } else { 0 }])
        },
    );

    find_contours::<u32>(&image)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            c.points
                .into_iter()
                .map(|p| DVec2::new(f64::from(p.x - PAD), f64::from(p.y - PAD)))
                .collect()
        })
        .collect()
}

/// Compress straight horizontal, vertical and diagonal runs of a closed
/// pixel chain down to their end points. The start point is always kept.
pub fn compress_chain(chain: &[DVec2]) -> Vec<DVec2> {
    let n = chain.len();
    if n < 3 {
        return chain.to_vec();
    }

    let step = |from: DVec2, to: DVec2| {
        let d = to - from;
        (direction(d.x), direction(d.y))
    };

    let mut out = vec![chain[0]];
    for i in 1..n {
        let incoming = step(chain[i - 1], chain[i]);
        let outgoing = step(chain[i], chain[(i + 1) % n]);
        if incoming != outgoing {
            out.push(chain[i]);
        }
    }
    out
}

#[inline]
fn direction(delta: f64) -> i8 {
    (delta > 0.0) as i8 - (delta < 0.0) as i8
}
