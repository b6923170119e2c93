//! Closed ring assembly with validation of degenerate geometry.

use std::f64::consts::PI;
use std::fmt;

use glam::DVec2;

use crate::config::AssemblerConfig;
use crate::coords::GeoPoint;

/// Compactness below which a ring is treated as having no area at all.
const ZERO_AREA_COMPACTNESS: f64 = 1e-12;

/// Why a vertex list could not become a valid ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingDefect {
    /// Fewer than three distinct vertices.
    TooFewPoints { distinct: usize },
    NonFinite,
    ZeroArea,
    SelfIntersecting,
    /// Valid but too thin; `compactness` is `4πA/P²`.
    Sliver { compactness: f64 },
}

impl fmt::Display for RingDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { distinct } => {
                write!(f, "only {distinct} distinct vertices")
            }
            Self::NonFinite => f.write_str("non-finite vertex"),
            Self::ZeroArea => f.write_str("zero area"),
            Self::SelfIntersecting => f.write_str("self-intersecting"),
            Self::Sliver { compactness } => write!(f, "sliver (compactness {compactness:.2e})"),
        }
    }
}

/// Builds closed rings (`first == last`, at least four vertices) and drops
/// the ones that would render as broken polygons.
#[derive(Debug, Clone, Default)]
pub struct PolygonAssembler {
    config: AssemblerConfig,
}

impl PolygonAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Build a ring, or `None` if the vertices are degenerate.
    pub fn assemble(&self, vertices: &[GeoPoint]) -> Option<Vec<GeoPoint>> {
        match self.build_ring(vertices) {
            Ok(ring) => Some(ring),
            Err(defect) => {
                tracing::trace!(vertices = vertices.len(), %defect, "Dropping ring");
                None
            }
        }
    }

    /// Build a ring from an ordered vertex list.
    ///
    /// Consecutive duplicates are removed and the ring is closed if needed.
    /// Non-finite, zero-area, self-intersecting and sliver rings are rejected.
    pub fn build_ring(&self, vertices: &[GeoPoint]) -> Result<Vec<GeoPoint>, RingDefect> {
        if vertices.iter().any(|p| !p.is_finite()) {
            return Err(RingDefect::NonFinite);
        }

        let mut ring: Vec<GeoPoint> = Vec::with_capacity(vertices.len() + 1);
        for &p in vertices {
            if ring.last() != Some(&p) {
                ring.push(p);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(RingDefect::TooFewPoints {
                distinct: ring.len(),
            });
        }

        let planar: Vec<DVec2> = ring.iter().map(|p| DVec2::new(p.lon, p.lat)).collect();
        let area = shoelace_area(&planar).abs();
        let perimeter = polyline_length(&planar, true);
        let compactness = 4.0 * PI * area / (perimeter * perimeter);
        if compactness.is_nan() || compactness <= ZERO_AREA_COMPACTNESS {
            return Err(RingDefect::ZeroArea);
        }
        if is_self_intersecting(&planar) {
            return Err(RingDefect::SelfIntersecting);
        }
        if compactness < self.config.min_compactness {
            return Err(RingDefect::Sliver { compactness });
        }

        ring.push(ring[0]);
        Ok(ring)
    }
}

// ============================================================================
// Planar geometry helpers
// ============================================================================

/// Signed polygon area via the shoelace formula (implicitly closed).
/// Positive for counter-clockwise vertex order in a y-up frame.
pub fn shoelace_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.perp_dot(b)
        })
        .sum();
    twice / 2.0
}

/// Total length of a polyline, including the closing segment when `closed`.
pub fn polyline_length(points: &[DVec2], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 1 => open + last.distance(*first),
        _ => open,
    }
}

/// True if any two non-adjacent edges of the implicitly closed ring touch.
fn is_self_intersecting(points: &[DVec2]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (points[i], points[(i + 1) % n]);
        for j in (i + 2)..n {
            // The last edge shares a vertex with the first one.
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
        coords.iter().map(|&(x, y)| GeoPoint::new(x, y)).collect()
    }

    #[test]
    fn test_square_is_closed() {
        let assembler = PolygonAssembler::default();
        let ring = assembler
            .build_ring(&pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]))
            .unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_already_closed_ring_is_not_closed_twice() {
        let assembler = PolygonAssembler::default();
        let ring = assembler
            .build_ring(&pts(&[
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 0.0),
            ]))
            .unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn test_consecutive_duplicates_are_removed() {
        let assembler = PolygonAssembler::default();
        let ring = assembler
            .build_ring(&pts(&[
                (0.0, 0.0),
                (0.0, 0.0),
                (2.0, 0.0),
                (2.0, 2.0),
                (2.0, 2.0),
                (0.0, 2.0),
            ]))
            .unwrap();
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn test_too_few_points() {
        let assembler = PolygonAssembler::default();
        assert_eq!(
            assembler.build_ring(&pts(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)])),
            Err(RingDefect::TooFewPoints { distinct: 2 })
        );
        assert!(assembler.assemble(&[]).is_none());
    }

    #[test]
    fn test_collinear_ring_has_zero_area() {
        let assembler = PolygonAssembler::default();
        assert_eq!(
            assembler.build_ring(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])),
            Err(RingDefect::ZeroArea)
        );
    }

    #[test]
    fn test_bowtie_is_self_intersecting() {
        let assembler = PolygonAssembler::default();
        assert_eq!(
            assembler.build_ring(&pts(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 1.0)])),
            Err(RingDefect::SelfIntersecting)
        );
    }

    #[test]
    fn test_sliver_is_rejected() {
        let assembler = PolygonAssembler::default();
        let result =
            assembler.build_ring(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 0.001), (0.0, 0.001)]));
        assert!(matches!(result, Err(RingDefect::Sliver { .. })), "got {result:?}");

        let lenient = PolygonAssembler::new(AssemblerConfig {
            min_compactness: 0.0,
        });
        assert!(lenient
            .build_ring(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 0.001), (0.0, 0.001)]))
            .is_ok());
    }

    #[test]
    fn test_non_finite_vertex() {
        let assembler = PolygonAssembler::default();
        assert_eq!(
            assembler.build_ring(&pts(&[(0.0, 0.0), (f64::INFINITY, 0.0), (1.0, 1.0)])),
            Err(RingDefect::NonFinite)
        );
    }

    #[test]
    fn test_shoelace_area_sign_and_magnitude() {
        let ccw = [
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 3.0),
            DVec2::new(0.0, 3.0),
        ];
        assert_eq!(shoelace_area(&ccw), 6.0);
        let cw: Vec<DVec2> = ccw.iter().rev().copied().collect();
        assert_eq!(shoelace_area(&cw), -6.0);
    }

    #[test]
    fn test_polyline_length_open_and_closed() {
        let square = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        assert_eq!(polyline_length(&square, false), 3.0);
        assert_eq!(polyline_length(&square, true), 4.0);
        assert_eq!(polyline_length(&square[..1], true), 0.0);
    }
}
