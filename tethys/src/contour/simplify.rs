//! Douglas–Peucker polyline simplification.

use glam::DVec2;

/// Distance from `p` to the infinite line through `a` and `b`, or to `a`
/// when the two coincide.
fn line_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len = ab.length();
    if len == 0.0 {
        return p.distance(a);
    }
    ab.perp_dot(p - a).abs() / len
}

/// Simplify an open polyline. The end points are always kept.
pub fn douglas_peucker(points: &[DVec2], epsilon: f64) -> Vec<DVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    // Explicit stack instead of recursion; long contours would otherwise
    // recurse once per kept vertex.
    let mut stack = vec![(0, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (points[start], points[end]);
        let (index, dist) = (start + 1..end)
            .map(|i| (i, line_distance(points[i], a, b)))
            .fold((start, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if dist > epsilon {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Simplify an implicitly closed polyline (first point not repeated).
///
/// The ring is split at the vertex farthest from the first one and both
/// halves are simplified as open polylines.
pub fn douglas_peucker_closed(points: &[DVec2], epsilon: f64) -> Vec<DVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let split = (1..points.len())
        .fold((0, -1.0), |best, i| {
            let d = points[i].distance_squared(first);
            if d > best.1 {
                (i, d)
            } else {
                best
            }
        })
        .0;

    let mut out = douglas_peucker(&points[..=split], epsilon);
    let mut second_half = points[split..].to_vec();
    second_half.push(first);
    let tail = douglas_peucker(&second_half, epsilon);

    // Drop the shared split vertex and the repeated first point.
    out.extend_from_slice(&tail[1..tail.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<DVec2> {
        coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }

    #[test]
    fn test_straight_line_collapses_to_end_points() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(douglas_peucker(&line, 0.1), pts(&[(0.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_corner_above_tolerance_is_kept() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.05), (2.0, 2.0), (3.0, 0.0)]);
        let simplified = douglas_peucker(&line, 0.8);
        assert_eq!(simplified, pts(&[(0.0, 0.0), (2.0, 2.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_zero_tolerance_keeps_every_non_collinear_vertex() {
        let line = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]);
        assert_eq!(douglas_peucker(&line, 0.0), line);
    }

    #[test]
    fn test_closed_square_with_midpoints() {
        let ring = pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (2.0, 2.0),
            (1.0, 2.0),
            (0.0, 2.0),
            (0.0, 1.0),
        ]);
        let simplified = douglas_peucker_closed(&ring, 0.1);
        assert_eq!(
            simplified,
            pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])
        );
    }

    #[test]
    fn test_short_inputs_are_unchanged() {
        let two = pts(&[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(douglas_peucker(&two, 1.0), two);
        assert_eq!(douglas_peucker_closed(&two, 1.0), two);
    }
}
