//! Pixel index to geographic coordinate mapping and local pixel scale.

use serde::{Serialize, Serializer};

use crate::constants::KM_PER_DEGREE;
use crate::error::{DetectionError, Result};
use crate::field::{Axis, ScalarField};

/// A geographic position. Serializes as `[lon, lat]` (GeoJSON order).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        [self.lon, self.lat].serialize(serializer)
    }
}

/// Maps grid indices of a [`ScalarField`] to lon/lat without interpolation.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    lon: &'a [f64],
    lat: &'a [f64],
}

impl<'a> CoordinateMapper<'a> {
    pub fn new(field: &'a ScalarField) -> Self {
        Self {
            lon: field.lon(),
            lat: field.lat(),
        }
    }

    /// Coordinate of pixel `(row, col)`. Indices past the end are clamped to
    /// the last coordinate. `None` only for a field without samples.
    pub fn pixel_to_geo(&self, row: usize, col: usize) -> Option<GeoPoint> {
        let row = row.min(self.lat.len().checked_sub(1)?);
        let col = col.min(self.lon.len().checked_sub(1)?);
        Some(GeoPoint::new(self.lon[col], self.lat[row]))
    }

    /// Integer pixel for a fractional contour vertex, truncating toward zero.
    /// `None` when the vertex falls outside the grid.
    pub fn pixel_index(&self, row: f64, col: f64) -> Option<(usize, usize)> {
        if !(row.is_finite() && col.is_finite()) || row < 0.0 || col < 0.0 {
            return None;
        }
        let (r, c) = (row as usize, col as usize);
        (r < self.lat.len() && c < self.lon.len()).then_some((r, c))
    }

    /// Absolute spacing between the first two coordinates of an axis.
    pub fn spacing_deg(&self, axis: Axis) -> Result<f64> {
        let coords = match axis {
            Axis::Longitude => self.lon,
            Axis::Latitude => self.lat,
        };
        if coords.len() < 2 {
            return Err(DetectionError::TooFewCoordinates {
                axis,
                len: coords.len(),
            });
        }
        Ok((coords[1] - coords[0]).abs())
    }

    /// Diagonal pixel size in kilometers at the given latitude.
    ///
    /// Combines the latitudinal and longitudinal resolution (degree spacing
    /// scaled by 111 km and 111·cos(lat) km) with a Euclidean norm.
    pub fn km_per_pixel(&self, at_lat_deg: f64) -> Result<f64> {
        let lat_km = self.spacing_deg(Axis::Latitude)? * KM_PER_DEGREE;
        let lon_km =
            self.spacing_deg(Axis::Longitude)? * KM_PER_DEGREE * at_lat_deg.to_radians().cos();
        let km = lat_km.hypot(lon_km);
        if !km.is_finite() || km <= 0.0 {
            return Err(DetectionError::DegenerateResolution { km_per_pixel: km });
        }
        Ok(km)
    }
}
