//! Phytoplankton bloom segmentation from the chlorophyll edge map.

use serde::Serialize;

use super::edges::edge_map;
use crate::config::{BloomConfig, EdgeConfig};
use crate::constants::{HIGH_BLOOM_CONCENTRATION, MODERATE_BLOOM_CONCENTRATION};
use crate::error::Result;
use crate::field::ScalarField;
use crate::ops::fill::fill_holes;
use crate::ops::labeling::LabelMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomIntensity {
    Low,
    Moderate,
    High,
}

impl BloomIntensity {
    /// Class of a bloom from its peak concentration in mg/m³.
    pub fn from_peak(max_concentration: f64) -> Self {
        if max_concentration > HIGH_BLOOM_CONCENTRATION {
            Self::High
        } else if max_concentration > MODERATE_BLOOM_CONCENTRATION {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// A region enclosed by chlorophyll edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bloom {
    #[serde(rename = "region_id")]
    pub label: u32,
    #[serde(rename = "area_pixels")]
    pub area_px: usize,
    #[serde(rename = "mean_chlorophyll")]
    pub mean_concentration: f64,
    #[serde(rename = "max_chlorophyll")]
    pub max_concentration: f64,
    #[serde(rename = "bloom_intensity")]
    pub intensity: BloomIntensity,
}

/// Regions of at least `min_area` pixels enclosed by (or made of) edge
/// pixels. Regions without a single valid sample are skipped.
pub fn segment_blooms(
    field: &ScalarField,
    edges: &EdgeConfig,
    config: &BloomConfig,
) -> Result<Vec<Bloom>> {
    edges.validate()?;
    if field.is_empty() {
        return Ok(Vec::new());
    }

    let filled = fill_holes(&edge_map(field, edges));
    let labels = LabelMap::from_mask(&filled, config.connectivity);

    let mut stats = vec![(0.0, 0usize, f64::NEG_INFINITY); labels.num_labels()];
    for (&label, &v) in labels.labels().iter().zip(field.values().iter()) {
        if label == 0 || !v.is_finite() {
            continue;
        }
        let (sum, count, max) = &mut stats[(label - 1) as usize];
        *sum += v;
        *count += 1;
        *max = max.max(v);
    }

    let blooms: Vec<Bloom> = labels
        .regions()
        .into_iter()
        .zip(stats)
        .filter(|(region, (_, count, _))| region.area >= config.min_area && *count > 0)
        .map(|(region, (sum, count, max))| Bloom {
            label: region.label,
            area_px: region.area,
            mean_concentration: sum / count as f64,
            max_concentration: max,
            intensity: BloomIntensity::from_peak(max),
        })
        .collect();

    tracing::debug!(
        regions = labels.num_labels(),
        blooms = blooms.len(),
        "Bloom segmentation finished"
    );
    Ok(blooms)
}
