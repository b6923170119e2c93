//! Configuration types for the feature detectors.
//!
//! Every detector takes its parameters explicitly; there is no global state.
//! Defaults reproduce the thresholds the overlay service ships with. All
//! structs deserialize with `#[serde(default)]`, so partial JSON documents
//! override only the fields they name.

use serde::{Deserialize, Serialize};

use crate::error::{DetectionError, Result};

// ============================================================================
// Enums
// ============================================================================

/// Pixel connectivity for connected component labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Only horizontal and vertical neighbors.
    Four,
    /// Horizontal, vertical and diagonal neighbors.
    #[default]
    Eight,
}

impl Connectivity {
    /// Neighbor offsets as `(d_row, d_col)`.
    pub fn offsets(self) -> &'static [(isize, isize)] {
        const FOUR: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
        const EIGHT: [(isize, isize); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        match self {
            Self::Four => &FOUR,
            Self::Eight => &EIGHT,
        }
    }
}

/// Finite-difference operator used by the front detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientOperator {
    /// 3x3 Sobel kernels with reflected borders (unnormalized, as in the
    /// established front product).
    #[default]
    Sobel,
    /// Second-order central differences, one-sided at the borders.
    Central,
}

// ============================================================================
// Front detection
// ============================================================================

/// Parameters of the gradient front detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontConfig {
    /// Gradient threshold in degrees per kilometer.
    pub threshold: f64,
    /// Mask components smaller than this many pixels are removed.
    pub min_component_size: usize,
    /// Connectivity used when measuring mask components.
    pub connectivity: Connectivity,
    /// Contours with fewer vertices are discarded.
    pub min_contour_vertices: usize,
    pub gradient: GradientOperator,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            min_component_size: 50,
            connectivity: Connectivity::Eight,
            min_contour_vertices: 10,
            gradient: GradientOperator::Sobel,
        }
    }
}

impl FrontConfig {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(DetectionError::invalid(
                "threshold",
                format!("must be a non-negative number, got {}", self.threshold),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Edge detection
// ============================================================================

/// Parameters of the chlorophyll edge detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Weak edge threshold as a fraction of the 0-255 range.
    pub low_threshold: f64,
    /// Strong edge threshold as a fraction of the 0-255 range.
    pub high_threshold: f64,
    /// Contours with fewer (run-compressed) vertices are discarded.
    pub min_contour_vertices: usize,
    /// Polyline simplification tolerance as a fraction of the contour perimeter.
    pub simplify_fraction: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 0.1,
            high_threshold: 0.3,
            min_contour_vertices: 10,
            simplify_fraction: 0.01,
        }
    }
}

impl EdgeConfig {
    pub fn with_thresholds(low_threshold: f64, high_threshold: f64) -> Self {
        Self {
            low_threshold,
            high_threshold,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("low_threshold", self.low_threshold)?;
        check_fraction("high_threshold", self.high_threshold)?;
        check_fraction("simplify_fraction", self.simplify_fraction)?;
        Ok(())
    }
}

// ============================================================================
// Eddy detection
// ============================================================================

/// Parameters of the Okubo-Weiss eddy detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EddyConfig {
    /// Regions with a smaller equivalent radius are discarded (km).
    pub min_radius_km: f64,
    /// Gaussian sigma (pixels) used to smooth the Okubo-Weiss field.
    pub smoothing_sigma: f64,
    /// Candidate pixels satisfy `W < -std_multiplier * stddev(W)`.
    pub std_multiplier: f64,
    /// Connectivity used when labeling candidate regions.
    pub connectivity: Connectivity,
}

impl Default for EddyConfig {
    fn default() -> Self {
        Self {
            min_radius_km: 10.0,
            smoothing_sigma: 2.0,
            std_multiplier: 0.5,
            connectivity: Connectivity::Eight,
        }
    }
}

impl EddyConfig {
    pub fn with_min_radius(min_radius_km: f64) -> Self {
        Self {
            min_radius_km,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_radius_km.is_finite() || self.min_radius_km < 0.0 {
            return Err(DetectionError::invalid(
                "min_radius_km",
                format!("must be a non-negative number, got {}", self.min_radius_km),
            ));
        }
        if !self.smoothing_sigma.is_finite() || self.smoothing_sigma <= 0.0 {
            return Err(DetectionError::invalid(
                "smoothing_sigma",
                format!("must be positive, got {}", self.smoothing_sigma),
            ));
        }
        if !self.std_multiplier.is_finite() || self.std_multiplier < 0.0 {
            return Err(DetectionError::invalid(
                "std_multiplier",
                format!("must be non-negative, got {}", self.std_multiplier),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Bloom segmentation
// ============================================================================

/// Parameters of bloom segmentation. Edge thresholds come from [`EdgeConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    /// Regions with fewer pixels are ignored.
    pub min_area: usize,
    pub connectivity: Connectivity,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            min_area: 100,
            connectivity: Connectivity::Eight,
        }
    }
}

// ============================================================================
// Polygon assembly
// ============================================================================

/// Acceptance rules for polygon rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Rings whose isoperimetric ratio `4πA/P²` falls below this are slivers.
    pub min_compactness: f64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            min_compactness: 1e-3,
        }
    }
}

impl AssemblerConfig {
    pub fn validate(&self) -> Result<()> {
        check_fraction("min_compactness", self.min_compactness)
    }
}

// ============================================================================
// Combined configuration
// ============================================================================

/// Configuration for every detector, passed explicitly per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub fronts: FrontConfig,
    pub edges: EdgeConfig,
    pub eddies: EddyConfig,
    pub blooms: BloomConfig,
    pub polygon: AssemblerConfig,
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<()> {
        self.fronts.validate()?;
        self.edges.validate()?;
        self.eddies.validate()?;
        self.polygon.validate()
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DetectionError::invalid(
            name,
            format!("must be in [0, 1], got {value}"),
        ));
    }
    Ok(())
}
