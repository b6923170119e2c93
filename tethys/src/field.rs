//! Gridded scalar field with its coordinate axes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_GRID_CELLS;
use crate::error::{DetectionError, Result};
use crate::grid::Grid2;

/// Coordinate axis of a [`ScalarField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Longitude,
    Latitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Longitude => f.write_str("longitude"),
            Self::Latitude => f.write_str("latitude"),
        }
    }
}

/// Immutable 2D field of samples on a regular lon/lat grid.
///
/// `values` has one row per latitude and one column per longitude. Missing
/// samples are NaN. Coordinates may be ascending or descending.
///
/// JSON form: `{ "data": [[...]], "lon": [...], "lat": [...], "units": "..." }`
/// where `null` samples stand for missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScalarField", into = "RawScalarField")]
pub struct ScalarField {
    values: Grid2<f64>,
    lon: Vec<f64>,
    lat: Vec<f64>,
    units: String,
}

impl ScalarField {
    /// Build a field, validating that the grid matches the coordinate vectors.
    pub fn new(
        values: Grid2<f64>,
        lon: Vec<f64>,
        lat: Vec<f64>,
        units: impl Into<String>,
    ) -> Result<Self> {
        if values.rows() != lat.len() || values.cols() != lon.len() {
            return Err(DetectionError::ShapeMismatch {
                rows: values.rows(),
                cols: values.cols(),
                lat_len: lat.len(),
                lon_len: lon.len(),
            });
        }
        if values.len() > MAX_GRID_CELLS {
            return Err(DetectionError::GridTooLarge {
                cells: values.len(),
                max: MAX_GRID_CELLS,
            });
        }
        check_finite(Axis::Longitude, &lon)?;
        check_finite(Axis::Latitude, &lat)?;

        Ok(Self {
            values,
            lon,
            lat,
            units: units.into(),
        })
    }

    /// Build a field from nested rows (`rows[lat_index][lon_index]`).
    pub fn from_rows(
        rows: Vec<Vec<f64>>,
        lon: Vec<f64>,
        lat: Vec<f64>,
        units: impl Into<String>,
    ) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(lon.len(), Vec::len);
        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for (row, samples) in rows.into_iter().enumerate() {
            if samples.len() != n_cols {
                return Err(DetectionError::RaggedRow {
                    row,
                    len: samples.len(),
                    expected: n_cols,
                });
            }
            cells.extend(samples);
        }
        Self::new(Grid2::new(n_rows, n_cols, cells), lon, lat, units)
    }

    #[inline]
    pub fn values(&self) -> &Grid2<f64> {
        &self.values
    }

    #[inline]
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    #[inline]
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    #[inline]
    pub fn units(&self) -> &str {
        &self.units
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.values.rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.values.cols()
    }

    /// True when the field holds no samples at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean of the latitude vector, 0 for a field without rows.
    pub fn mean_latitude(&self) -> f64 {
        if self.lat.is_empty() {
            return 0.0;
        }
        self.lat.iter().sum::<f64>() / self.lat.len() as f64
    }

    /// Mean over valid (finite) samples, `None` if every sample is missing.
    pub fn valid_mean(&self) -> Option<f64> {
        let (sum, count) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Copy of the values with every missing sample replaced by `fill`.
    pub fn filled(&self, fill: f64) -> Grid2<f64> {
        self.values
            .map(|&v| if v.is_finite() { v } else { fill })
    }
}

fn check_finite(axis: Axis, coords: &[f64]) -> Result<()> {
    match coords.iter().position(|c| !c.is_finite()) {
        Some(index) => Err(DetectionError::NonFiniteCoordinate { axis, index }),
        None => Ok(()),
    }
}

/// Wire form of a [`ScalarField`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawScalarField {
    data: Vec<Vec<Option<f64>>>,
    lon: Vec<f64>,
    lat: Vec<f64>,
    #[serde(default)]
    units: String,
}

impl TryFrom<RawScalarField> for ScalarField {
    type Error = DetectionError;

    fn try_from(raw: RawScalarField) -> Result<Self> {
        let rows = raw
            .data
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect();
        Self::from_rows(rows, raw.lon, raw.lat, raw.units)
    }
}

impl From<ScalarField> for RawScalarField {
    fn from(field: ScalarField) -> Self {
        let cols = field.cols();
        let data = field
            .values
            .cells()
            .chunks(cols.max(1))
            .take(field.rows())
            .map(|row| {
                row.iter()
                    .map(|&v| v.is_finite().then_some(v))
                    .collect()
            })
            .collect();
        Self {
            data,
            lon: field.lon,
            lat: field.lat,
            units: field.units,
        }
    }
}
