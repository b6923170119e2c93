//! Test utilities: tracing setup and synthetic fields.

use crate::field::ScalarField;
use crate::grid::Grid2;

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Binary mask from rows of `#` (set) and `.` (clear).
pub fn mask_from_ascii(rows: &[&str]) -> Grid2<bool> {
    let cols = rows.first().map_or(0, |r| r.len());
    Grid2::from_fn(rows.len(), cols, |r, c| rows[r].as_bytes()[c] == b'#')
}

/// `n` evenly spaced coordinates starting at `start`.
pub fn regular_axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Field on a regular grid with `step` degree spacing, lower-left corner at
/// (`lon0`, `lat0`).
pub fn field_from_fn(
    rows: usize,
    cols: usize,
    lon0: f64,
    lat0: f64,
    step: f64,
    f: impl FnMut(usize, usize) -> f64,
) -> ScalarField {
    ScalarField::new(
        Grid2::from_fn(rows, cols, f),
        regular_axis(lon0, step, cols),
        regular_axis(lat0, step, rows),
        "",
    )
    .unwrap()
}

pub fn uniform_field(rows: usize, cols: usize, value: f64) -> ScalarField {
    field_from_fn(rows, cols, -75.0, 30.0, 0.1, |_, _| value)
}

/// 40x60 SST field at 0.01° spacing with a linear ramp from 15 to 25 over
/// columns 25..=35.
pub fn step_field() -> ScalarField {
    field_from_fn(40, 60, -75.0, 35.0, 0.01, |_, c| {
        15.0 + (c as f64 - 25.0).clamp(0.0, 10.0)
    })
}

/// 60x60 SST field at 0.05° spacing: 20 °C background plus a Gaussian blob
/// of the given amplitude (sigma 4 px) at the grid center.
pub fn blob_field(amplitude: f64) -> ScalarField {
    field_from_fn(60, 60, -70.0, 30.0, 0.05, |r, c| {
        let dr = r as f64 - 30.0;
        let dc = c as f64 - 30.0;
        20.0 + amplitude * (-(dr * dr + dc * dc) / (2.0 * 16.0)).exp()
    })
}

/// 60x60 chlorophyll field at 0.1° spacing: 0.1 mg/m³ background and a
/// 5 mg/m³ disk of radius 10 px at the grid center.
pub fn chlorophyll_disk_field() -> ScalarField {
    field_from_fn(60, 60, -75.0, 30.0, 0.1, |r, c| {
        let dr = r as f64 - 30.0;
        let dc = c as f64 - 30.0;
        if dr * dr + dc * dc <= 100.0 {
            5.0
        } else {
            0.1
        }
    })
}

pub fn all_nan_field(rows: usize, cols: usize) -> ScalarField {
    field_from_fn(rows, cols, -75.0, 30.0, 0.1, |_, _| f64::NAN)
}
