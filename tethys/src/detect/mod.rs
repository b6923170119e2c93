//! Feature detectors.
//!
//! Every detector is a pure function of the field and its configuration.
//! [`FeatureDetector`] bundles a validated [`DetectionConfig`] and runs the
//! detectors individually, together on one field, or over a batch of fields.


pub mod blooms;
pub mod eddies;
pub mod edges;
pub mod fronts;

use rayon::prelude::*;

pub use blooms::{segment_blooms, Bloom, BloomIntensity};
pub use eddies::{detect_eddies, detect_eddies_with_config, okubo_weiss_field};
pub use edges::{detect_edges, detect_edges_with_config, edge_map};
pub use fronts::{detect_fronts, detect_fronts_with_config};

use crate::config::DetectionConfig;
use crate::error::Result;
use crate::feature::{ChlorophyllEdge, Eddy, Feature, ThermalFront};
use crate::field::ScalarField;
use crate::polygon::PolygonAssembler;

/// Immutable detector front-end holding only configuration.
#[derive(Debug, Clone)]
pub struct FeatureDetector {
    config: DetectionConfig,
    assembler: PolygonAssembler,
}

impl Default for FeatureDetector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

impl FeatureDetector {
    /// Create a detector without validating the configuration. Invalid
    /// parameters surface as errors from the individual detectors.
    pub fn new(config: DetectionConfig) -> Self {
        let assembler = PolygonAssembler::new(config.polygon.clone());
        Self { config, assembler }
    }

    /// Create a detector, rejecting invalid parameters up front.
    pub fn from_config(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn fronts(&self, field: &ScalarField) -> Result<Vec<ThermalFront>> {
        detect_fronts_with_config(field, &self.config.fronts)
    }

    pub fn edges(&self, field: &ScalarField) -> Result<Vec<ChlorophyllEdge>> {
        detect_edges_with_config(field, &self.config.edges, &self.assembler)
    }

    pub fn eddies(&self, field: &ScalarField) -> Result<Vec<Eddy>> {
        detect_eddies_with_config(field, &self.config.eddies, &self.assembler)
    }

    pub fn blooms(&self, field: &ScalarField) -> Result<Vec<Bloom>> {
        segment_blooms(field, &self.config.edges, &self.config.blooms)
    }

    /// Run all three detectors on one field concurrently.
    ///
    /// Output order is fixed: fronts, then edges, then eddies, so identical
    /// inputs produce identical output regardless of scheduling.
    pub fn detect_all(&self, field: &ScalarField) -> Result<Vec<Feature>> {
        let (fronts, (edges, eddies)) = rayon::join(
            || self.fronts(field),
            || rayon::join(|| self.edges(field), || self.eddies(field)),
        );
        let (fronts, edges, eddies) = (fronts?, edges?, eddies?);

        let mut features = Vec::with_capacity(fronts.len() + edges.len() + eddies.len());
        features.extend(fronts.into_iter().map(Feature::from));
        features.extend(edges.into_iter().map(Feature::from));
        features.extend(eddies.into_iter().map(Feature::from));
        Ok(features)
    }

    /// [`Self::detect_all`] over independent fields in parallel, results in
    /// input order.
    pub fn detect_batch(&self, fields: &[ScalarField]) -> Vec<Result<Vec<Feature>>> {
        fields
            .par_iter()
            .map(|field| self.detect_all(field))
            .collect()
    }
}
