//! Iso-contour tracing with marching squares.
//!
//! Each 2×2 cell of samples is classified by which corners lie above the
//! level; the cell emits up to two line segments whose end points are
//! linearly interpolated along the cell edges. Segments are then chained
//! into polylines. A polyline whose first and last points coincide is
//! closed, otherwise it ends at the grid border.
//!
//! Saddle cells separate the low corners. Squares with a non-finite corner
//! emit nothing.

use std::collections::{HashMap, VecDeque};

use glam::DVec2;

use crate::grid::Grid2;

/// Trace the iso-lines of `grid` at `level`.
///
/// Points are `DVec2 { x: col, y: row }` in fractional pixel coordinates.
/// Contours are returned in the order their first segment was found during
/// a row-major scan of the cells.
pub fn find_contours(grid: &Grid2<f64>, level: f64) -> Vec<Vec<DVec2>> {
    let segments = contour_segments(grid, level);
    assemble_contours(&segments)
}

#[inline]
fn fraction(from: f64, to: f64, level: f64) -> f64 {
    if to == from {
        return 0.0;
    }
    (level - from) / (to - from)
}

fn contour_segments(grid: &Grid2<f64>, level: f64) -> Vec<(DVec2, DVec2)> {
    let mut segments = Vec::new();
    if grid.rows() < 2 || grid.cols() < 2 {
        return segments;
    }

    for r0 in 0..grid.rows() - 1 {
        let r1 = r0 + 1;
        for c0 in 0..grid.cols() - 1 {
            let c1 = c0 + 1;
            let ul = grid[(r0, c0)];
            let ur = grid[(r0, c1)];
            let ll = grid[(r1, c0)];
            let lr = grid[(r1, c1)];
            if !(ul.is_finite() && ur.is_finite() && ll.is_finite() && lr.is_finite()) {
                continue;
            }

            let mut case = 0u8;
            if ul > level {
                case |= 1;
            }
            if ur > level {
                case |= 2;
            }
            if ll > level {
                case |= 4;
            }
            if lr > level {
                case |= 8;
            }
            if case == 0 || case == 15 {
                continue;
            }

            let (r0f, c0f) = (r0 as f64, c0 as f64);
            let top = DVec2::new(c0f + fraction(ul, ur, level), r0f);
            let bottom = DVec2::new(c0f + fraction(ll, lr, level), r1 as f64);
            let left = DVec2::new(c0f, r0f + fraction(ul, ll, level));
            let right = DVec2::new(c1 as f64, r0f + fraction(ur, lr, level));

            match case {
                1 => segments.push((top, left)),
                2 => segments.push((right, top)),
                3 => segments.push((right, left)),
                4 => segments.push((left, bottom)),
                5 => segments.push((top, bottom)),
                6 => {
                    segments.push((right, top));
                    segments.push((left, bottom));
                }
                7 => segments.push((right, bottom)),
                8 => segments.push((bottom, right)),
                9 => {
                    segments.push((top, left));
                    segments.push((bottom, right));
                }
                10 => segments.push((bottom, top)),
                11 => segments.push((bottom, left)),
                12 => segments.push((left, right)),
                13 => segments.push((top, right)),
                14 => segments.push((left, top)),
                _ => unreachable!("cases 0 and 15 emit no segment"),
            }
        }
    }
    segments
}

/// Bit-exact hash key for a point; `-0.0` folds into `0.0`.
type PointKey = (u64, u64);

#[inline]
fn key(p: DVec2) -> PointKey {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

fn assemble_contours(segments: &[(DVec2, DVec2)]) -> Vec<Vec<DVec2>> {
    let mut contours: Vec<Option<VecDeque<DVec2>>> = Vec::new();
    // Open contour index by its first and last point.
    let mut starts: HashMap<PointKey, usize> = HashMap::new();
    let mut ends: HashMap<PointKey, usize> = HashMap::new();

    for &(from, to) in segments {
        if from == to {
            continue;
        }

        let tail = starts.remove(&key(to));
        let head = ends.remove(&key(from));

        match (tail, head) {
            (Some(tail), Some(head)) if tail == head => {
                // The segment closes a loop.
                if let Some(contour) = contours[head].as_mut() {
                    contour.push_back(to);
                }
            }
            (Some(tail), Some(head)) => {
                // The segment joins two contours; the older one absorbs the newer.
                let (Some(tail_points), Some(head_points)) =
                    (contours[tail].take(), contours[head].take())
                else {
                    continue;
                };
                let (survivor, merged) = if tail > head {
                    let mut merged = head_points;
                    merged.extend(tail_points);
                    (head, merged)
                } else {
                    let mut merged = tail_points;
                    starts.remove(&key(head_points[0]));
                    for p in head_points.into_iter().rev() {
                        merged.push_front(p);
                    }
                    (tail, merged)
                };
                if let (Some(&first), Some(&last)) = (merged.front(), merged.back()) {
                    starts.insert(key(first), survivor);
                    ends.insert(key(last), survivor);
                }
                contours[survivor] = Some(merged);
            }
            (None, None) => {
                let index = contours.len();
                contours.push(Some(VecDeque::from([from, to])));
                starts.insert(key(from), index);
                ends.insert(key(to), index);
            }
            (Some(tail), None) => {
                if let Some(contour) = contours[tail].as_mut() {
                    contour.push_front(from);
                }
                starts.insert(key(from), tail);
            }
            (None, Some(head)) => {
                if let Some(contour) = contours[head].as_mut() {
                    contour.push_back(to);
                }
                ends.insert(key(to), head);
            }
        }
    }

    contours
        .into_iter()
        .flatten()
        .map(Vec::from)
        .collect()
}
