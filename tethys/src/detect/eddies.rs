//! Mesoscale eddy detection with the Okubo-Weiss parameter.
//!
//! The field itself stands in for a streamfunction: a geostrophic-style
//! velocity is derived from its gradient and the Coriolis parameter at the
//! mean latitude. This is a proxy for altimetry-derived currents, not a
//! physical reconstruction.

use std::f64::consts::TAU;

use crate::config::{AssemblerConfig, EddyConfig};
use crate::constants::{EARTH_ROTATION_RATE, EDDY_RING_VERTICES, KM_PER_DEGREE};
use crate::coords::{CoordinateMapper, GeoPoint};
use crate::error::Result;
use crate::feature::{Eddy, EddyType};
use crate::field::ScalarField;
use crate::grid::Grid2;
use crate::ops::convolution::{gaussian_blur, BorderMode};
use crate::ops::gradient::central_difference;
use crate::ops::labeling::LabelMap;
use crate::polygon::PolygonAssembler;

/// Gaussian smoothing kernel radius in sigmas.
const SMOOTHING_TRUNCATE: f64 = 4.0;

/// Detect eddies with an equivalent radius of at least `min_radius_km`.
pub fn detect_eddies(field: &ScalarField, min_radius_km: f64) -> Result<Vec<Eddy>> {
    detect_eddies_with_config(
        field,
        &EddyConfig::with_min_radius(min_radius_km),
        &PolygonAssembler::new(AssemblerConfig::default()),
    )
}

pub fn detect_eddies_with_config(
    field: &ScalarField,
    config: &EddyConfig,
    assembler: &PolygonAssembler,
) -> Result<Vec<Eddy>> {
    config.validate()?;

    let Some(field_mean) = field.valid_mean() else {
        tracing::debug!("No valid samples, no eddies");
        return Ok(Vec::new());
    };

    let w = okubo_weiss(field, field_mean);
    let smooth = gaussian_blur(&w, config.smoothing_sigma, SMOOTHING_TRUNCATE, BorderMode::Nearest);
    let cutoff = -config.std_multiplier * smooth.std_dev().unwrap_or(0.0);
    let mask = smooth.map(|&v| v < cutoff);

    let labels = LabelMap::from_mask(&mask, config.connectivity);
    let region_means = labels.mean_by_label(field.values());
    let region_w = labels.mean_by_label(&smooth);
    let mapper = CoordinateMapper::new(field);

    let mut eddies = Vec::new();
    for region in labels.regions() {
        let index = (region.label - 1) as usize;
        let (centroid_row, centroid_col) = region.centroid();
        let Some(centroid) = mapper.pixel_to_geo(centroid_row as usize, centroid_col as usize)
        else {
            continue;
        };

        let radius_px = (region.area as f64 / std::f64::consts::PI).sqrt();
        let radius_km = radius_px * mapper.km_per_pixel(centroid.lat)?;
        if radius_km < config.min_radius_km {
            tracing::trace!(label = region.label, radius_km, "Eddy below minimum radius");
            continue;
        }

        // A region without valid samples has no anomaly.
        let region_mean = if region_means[index].is_finite() {
            region_means[index]
        } else {
            field_mean
        };
        let eddy_type = if region_mean > field_mean {
            EddyType::WarmCore
        } else {
            EddyType::ColdCore
        };

        let Some(ring) = assembler.assemble(&circle(centroid, radius_km)) else {
            continue;
        };

        eddies.push(Eddy {
            id: region.label,
            ring,
            eddy_type,
            radius_km,
            centroid_lon: centroid.lon,
            centroid_lat: centroid.lat,
            okubo_weiss: region_w[index],
            anomaly: region_mean - field_mean,
        });
    }

    tracing::debug!(
        regions = labels.num_labels(),
        eddies = eddies.len(),
        cutoff,
        "Eddy detection finished"
    );
    Ok(eddies)
}

/// Raw Okubo-Weiss parameter `W = Sn² + Ss² − ω²` of the field.
///
/// Missing samples are replaced by the mean of the valid ones. A field
/// without valid samples yields an all-zero grid.
pub fn okubo_weiss_field(field: &ScalarField) -> Grid2<f64> {
    match field.valid_mean() {
        Some(mean) => okubo_weiss(field, mean),
        None => Grid2::new_filled(field.rows(), field.cols(), 0.0),
    }
}

fn okubo_weiss(field: &ScalarField, fill: f64) -> Grid2<f64> {
    let values = field.filled(fill);
    let (gx, gy) = central_difference(&values);

    let f = 2.0 * EARTH_ROTATION_RATE * field.mean_latitude().to_radians().sin();
    let (u, v) = if f == 0.0 {
        tracing::warn!(
            mean_latitude = field.mean_latitude(),
            "Coriolis parameter is zero, using zero velocity"
        );
        let zero = Grid2::new_filled(values.rows(), values.cols(), 0.0);
        (zero.clone(), zero)
    } else {
        (gy.map(|&g| -g / f), gx.map(|&g| g / f))
    };

    let (du_dx, du_dy) = central_difference(&u);
    let (dv_dx, dv_dy) = central_difference(&v);

    Grid2::from_fn(values.rows(), values.cols(), |r, c| {
        let idx = (r, c);
        let normal_strain = du_dx[idx] - dv_dy[idx];
        let shear_strain = dv_dx[idx] + du_dy[idx];
        let vorticity = dv_dx[idx] - du_dy[idx];
        normal_strain * normal_strain + shear_strain * shear_strain - vorticity * vorticity
    })
}

/// Ring of `EDDY_RING_VERTICES` distinct points around `center`, with the
/// radius converted to degrees separately per axis.
fn circle(center: GeoPoint, radius_km: f64) -> Vec<GeoPoint> {
    let radius_lat = radius_km / KM_PER_DEGREE;
    let radius_lon = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos());
    (0..EDDY_RING_VERTICES)
        .map(|k| {
            let angle = TAU * k as f64 / EDDY_RING_VERTICES as f64;
            GeoPoint::new(
                center.lon + radius_lon * angle.cos(),
                center.lat + radius_lat * angle.sin(),
            )
        })
        .collect()
}
