//! Ocean feature detection on gridded satellite fields.
//!
//! Given a [`ScalarField`] (sea-surface temperature or chlorophyll on a
//! regular lon/lat grid) the detectors derive map overlay geometry:
//!
//! - [`detect_fronts`]: open polylines along strong temperature gradients.
//! - [`detect_edges`]: closed rings around productivity boundaries.
//! - [`detect_eddies`]: circular rings approximating rotation-dominated
//!   regions found with the Okubo-Weiss parameter.
//!
//! All detectors are pure functions of the field and their parameters.
//! [`FeatureDetector`] bundles a [`DetectionConfig`] and can run the three
//! detectors on one field in parallel. Results serialize to GeoJSON
//! `Feature` objects with coordinates in `[lon, lat]` order.

pub mod config;
pub mod constants;
pub mod contour;
pub mod coords;
pub mod detect;
pub mod edge_operator;
pub mod error;
pub mod feature;
pub mod field;
pub mod grid;
pub mod log_setup;
pub mod ops;
pub mod polygon;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{
    AssemblerConfig, BloomConfig, Connectivity, DetectionConfig, EddyConfig, EdgeConfig,
    FrontConfig, GradientOperator,
};
pub use coords::{CoordinateMapper, GeoPoint};
pub use detect::{
    detect_eddies, detect_eddies_with_config, detect_edges, detect_edges_with_config,
    detect_fronts, detect_fronts_with_config, okubo_weiss_field, segment_blooms, Bloom,
    BloomIntensity, FeatureDetector,
};
pub use error::{DetectionError, Result};
pub use feature::{ChlorophyllEdge, Eddy, EddyType, Feature, ThermalFront};
pub use field::{Axis, ScalarField};
pub use grid::Grid2;
pub use log_setup::{setup_logging, LogSetupError};
pub use polygon::{PolygonAssembler, RingDefect};
