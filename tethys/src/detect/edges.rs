//! Chlorophyll edge detection on the log-scaled concentration field.

use crate::config::{AssemblerConfig, EdgeConfig};
use crate::constants::CHLOROPHYLL_FLOOR;
use crate::contour::border::{compress_chain, external_contours};
use crate::contour::simplify::douglas_peucker_closed;
use crate::coords::CoordinateMapper;
use crate::edge_operator::canny;
use crate::error::Result;
use crate::feature::ChlorophyllEdge;
use crate::field::ScalarField;
use crate::grid::Grid2;
use crate::ops::convolution::binomial_blur_5x5;
use crate::polygon::{polyline_length, shoelace_area, PolygonAssembler};

/// Detect edges with thresholds given as fractions of the 0-255 range.
pub fn detect_edges(field: &ScalarField, low: f64, high: f64) -> Result<Vec<ChlorophyllEdge>> {
    detect_edges_with_config(
        field,
        &EdgeConfig::with_thresholds(low, high),
        &PolygonAssembler::new(AssemblerConfig::default()),
    )
}

pub fn detect_edges_with_config(
    field: &ScalarField,
    config: &EdgeConfig,
    assembler: &PolygonAssembler,
) -> Result<Vec<ChlorophyllEdge>> {
    config.validate()?;
    if field.is_empty() {
        return Ok(Vec::new());
    }

    let edges = edge_map(field, config);
    let features = trace_edges(&edges, &CoordinateMapper::new(field), config, assembler);

    tracing::debug!(
        edge_pixels = edges.count_set(),
        edges = features.len(),
        "Edge detection finished"
    );
    Ok(features)
}

/// Rings around the outer borders of an edge map. Borders with fewer than
/// `min_contour_vertices` vertices after run compression are discarded.
fn trace_edges(
    edges: &Grid2<bool>,
    mapper: &CoordinateMapper<'_>,
    config: &EdgeConfig,
    assembler: &PolygonAssembler,
) -> Vec<ChlorophyllEdge> {
    let contours = external_contours(edges);

    let mut features = Vec::new();
    for (id, chain) in contours.iter().enumerate() {
        let contour = compress_chain(chain);
        if contour.len() < config.min_contour_vertices {
            continue;
        }

        let perimeter = polyline_length(&contour, true);
        let area = shoelace_area(&contour).abs();
        let simplified = douglas_peucker_closed(&contour, config.simplify_fraction * perimeter);

        let vertices: Vec<_> = simplified
            .iter()
            .filter_map(|p| mapper.pixel_to_geo(p.y as usize, p.x as usize))
            .collect();
        let Some(ring) = assembler.assemble(&vertices) else {
            continue;
        };

        features.push(ChlorophyllEdge {
            id,
            ring,
            area_px: area,
            perimeter_px: perimeter,
        });
    }

    tracing::trace!(contours = contours.len(), kept = features.len(), "Edge rings");
    features
}

/// Binary edge map of the field.
///
/// Samples are floored at 0.01 (missing samples included), log10-scaled,
/// stretched to 0-255, blurred with a 5x5 binomial kernel and passed through
/// the dual-threshold edge operator.
pub fn edge_map(field: &ScalarField, config: &EdgeConfig) -> Grid2<bool> {
    let log = field.values().map(|&v| {
        let v = if v.is_finite() { v.max(CHLOROPHYLL_FLOOR) } else { CHLOROPHYLL_FLOOR };
        v.log10()
    });
    let image = binomial_blur_5x5(&normalize_to_u8(&log));
    canny(
        &image,
        (config.low_threshold * 255.0).trunc(),
        (config.high_threshold * 255.0).trunc(),
    )
}

/// Min-max stretch to 0..=255, truncating. A constant grid maps to 0.
fn normalize_to_u8(grid: &Grid2<f64>) -> Grid2<u8> {
    let (Some(min), Some(max)) = (grid.min_finite(), grid.max_finite()) else {
        return grid.map(|_| 0);
    };
    let range = max - min;
    let scale = if range > f64::EPSILON { 255.0 / range } else { 0.0 };
    let shift = -min * scale;
    grid.map(|&v| (v * scale + shift).clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mask_from_ascii, uniform_field};

    fn config_with_min_vertices(min_contour_vertices: usize) -> EdgeConfig {
        EdgeConfig {
            min_contour_vertices,
            ..EdgeConfig::default()
        }
    }

    #[test]
    fn test_square_border_compresses_to_four_vertices() {
        let edges = mask_from_ascii(&[
            "........",
            ".######.",
            ".#....#.",
            ".#....#.",
            ".#....#.",
            ".######.",
            "........",
        ]);
        let field = uniform_field(7, 8, 1.0);
        let mapper = CoordinateMapper::new(&field);
        let assembler = PolygonAssembler::default();

        // Default minimum of 10 drops the square.
        assert!(trace_edges(&edges, &mapper, &EdgeConfig::default(), &assembler).is_empty());
        assert!(trace_edges(&edges, &mapper, &config_with_min_vertices(5), &assembler).is_empty());

        let kept = trace_edges(&edges, &mapper, &config_with_min_vertices(4), &assembler);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ring.len(), 5);
        assert_eq!(kept[0].area_px, 20.0);
        assert_eq!(kept[0].ring[0], mapper.pixel_to_geo(1, 1).unwrap());
    }

    #[test]
    fn test_round_border_keeps_enough_vertices() {
        // One pixel wide ring of radius 8 around (10, 10).
        let edges = Grid2::from_fn(21, 21, |r, c| {
            let d = (r as f64 - 10.0).hypot(c as f64 - 10.0);
            (d - 8.0).abs() < 0.5
        });
        let field = uniform_field(21, 21, 1.0);
        let mapper = CoordinateMapper::new(&field);

        let kept = trace_edges(
            &edges,
            &mapper,
            &EdgeConfig::default(),
            &PolygonAssembler::default(),
        );
        assert_eq!(kept.len(), 1);
        assert!(kept[0].ring.len() >= 4);
        assert!(kept[0].area_px > 150.0, "area {}", kept[0].area_px);
    }

    #[test]
    fn test_normalize_stretches_to_full_range() {
        let grid = Grid2::new(1, 3, vec![-2.0, -0.5, 1.0]);
        let out = normalize_to_u8(&grid);
        assert_eq!(out.cells(), &[0, 127, 255]);
    }

    #[test]
    fn test_normalize_constant_grid_is_zero() {
        let grid = Grid2::new_filled(2, 2, 3.0);
        assert!(normalize_to_u8(&grid).iter().all(|&v| v == 0));
    }
}
