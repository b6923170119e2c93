//! Thermal front detection from the horizontal gradient magnitude.

use crate::config::{FrontConfig, GradientOperator};
use crate::constants::MASK_CONTOUR_LEVEL;
use crate::contour::marching_squares::find_contours;
use crate::coords::CoordinateMapper;
use crate::error::Result;
use crate::feature::ThermalFront;
use crate::field::ScalarField;
use crate::grid::Grid2;
use crate::ops::convolution::BorderMode;
use crate::ops::gradient::{central_difference, magnitude, sobel};
use crate::ops::labeling::remove_small_components;

/// Detect fronts where the gradient exceeds `threshold` (field units per km).
pub fn detect_fronts(field: &ScalarField, threshold: f64) -> Result<Vec<ThermalFront>> {
    detect_fronts_with_config(field, &FrontConfig::with_threshold(threshold))
}

/// Detect thermal fronts.
///
/// Missing samples are replaced by 0 before differentiation, which puts
/// artificial fronts along the edges of data gaps. Fronts are traced as the
/// iso-lines of the cleaned threshold mask; each vertex is mapped through its
/// truncated pixel index and the front strength is the mean gradient at
/// those pixels.
pub fn detect_fronts_with_config(
    field: &ScalarField,
    config: &FrontConfig,
) -> Result<Vec<ThermalFront>> {
    config.validate()?;

    let Some(gradient) = gradient_per_pixel(field, config.gradient) else {
        tracing::debug!("Flat or empty field, no fronts");
        return Ok(Vec::new());
    };

    let mapper = CoordinateMapper::new(field);
    let km_per_pixel = mapper.km_per_pixel(field.mean_latitude())?;
    let gradient = gradient.map(|&g| g / km_per_pixel);

    let mask = gradient.map(|&g| g > config.threshold);
    let above = mask.count_set();
    let mask = remove_small_components(&mask, config.min_component_size, config.connectivity);
    tracing::debug!(
        above,
        kept = mask.count_set(),
        km_per_pixel,
        "Front mask"
    );

    let contours = find_contours(&mask.map(|&m| f64::from(u8::from(m))), MASK_CONTOUR_LEVEL);

    let mut fronts = Vec::new();
    for (id, contour) in contours.iter().enumerate() {
        if contour.len() < config.min_contour_vertices {
            continue;
        }

        let mut geometry = Vec::with_capacity(contour.len());
        let mut strength_sum = 0.0;
        for vertex in contour {
            let Some((row, col)) = mapper.pixel_index(vertex.y, vertex.x) else {
                continue;
            };
            let Some(point) = mapper.pixel_to_geo(row, col) else {
                continue;
            };
            geometry.push(point);
            strength_sum += gradient[(row, col)];
        }
        if geometry.len() < 3 {
            continue;
        }

        fronts.push(ThermalFront {
            id,
            strength: strength_sum / geometry.len() as f64,
            threshold: config.threshold,
            geometry,
        });
    }

    tracing::debug!(
        contours = contours.len(),
        fronts = fronts.len(),
        "Front detection finished"
    );
    Ok(fronts)
}

/// Gradient magnitude per pixel, `None` when the field is empty or flat.
fn gradient_per_pixel(field: &ScalarField, operator: GradientOperator) -> Option<Grid2<f64>> {
    if field.is_empty() {
        return None;
    }
    let values = field.filled(0.0);
    let (d_col, d_row) = match operator {
        GradientOperator::Sobel => sobel(&values, BorderMode::Reflect101),
        GradientOperator::Central => central_difference(&values),
    };
    let gradient = magnitude(&d_col, &d_row);
    match gradient.max_finite() {
        Some(max) if max > 0.0 => Some(gradient),
        _ => None,
    }
}
