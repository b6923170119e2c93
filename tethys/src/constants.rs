//! Physical and algorithmic constants shared by the detectors.

/// Kilometers per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.0;

/// Earth's angular rotation rate in rad/s.
pub const EARTH_ROTATION_RATE: f64 = 7.2921e-5;

/// Floor applied to missing or non-positive chlorophyll samples (mg/m³)
/// before the logarithm.
pub const CHLOROPHYLL_FLOOR: f64 = 0.01;

/// Iso-level used when tracing contours of a binary mask.
pub const MASK_CONTOUR_LEVEL: f64 = 0.5;

/// Number of distinct vertices on a synthesized eddy ring. The emitted ring
/// carries one more (the closing vertex).
pub const EDDY_RING_VERTICES: usize = 32;

/// Largest grid accepted by [`crate::ScalarField`]. Expected regional grids are
/// a few hundred cells per axis; anything beyond 2048x2048 is rejected.
pub const MAX_GRID_CELLS: usize = 2048 * 2048;

/// Bloom peak concentration (mg/m³) above which a bloom is classed as high.
pub const HIGH_BLOOM_CONCENTRATION: f64 = 10.0;

/// Bloom peak concentration (mg/m³) above which a bloom is classed as moderate.
pub const MODERATE_BLOOM_CONCENTRATION: f64 = 1.0;
