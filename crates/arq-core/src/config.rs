use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COLLECTION_THRESHOLD_M, DEFAULT_DEMO_OFFSET_M, DEFAULT_FIELD_OF_VIEW_DEG,
    DEFAULT_MIN_SCALE, DEFAULT_VISIBILITY_THRESHOLD_M,
};
use crate::error::{EngineError, Result};
use crate::proximity::Thresholds;

/// Tunables for a proximity session. Missing keys fall back to defaults
/// when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub collection_threshold_m: f64,
    pub visibility_threshold_m: f64,
    pub demo_offset_m: f64,
    pub min_scale: f64,
    pub field_of_view_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collection_threshold_m: DEFAULT_COLLECTION_THRESHOLD_M,
            visibility_threshold_m: DEFAULT_VISIBILITY_THRESHOLD_M,
            demo_offset_m: DEFAULT_DEMO_OFFSET_M,
            min_scale: DEFAULT_MIN_SCALE,
            field_of_view_deg: DEFAULT_FIELD_OF_VIEW_DEG,
        }
    }
}

impl EngineConfig {
    /// Validate and return the threshold pair.
    pub fn validate(&self) -> Result<Thresholds> {
        let thresholds =
            Thresholds::new(self.collection_threshold_m, self.visibility_threshold_m)?;
        if !(self.demo_offset_m.is_finite() && self.demo_offset_m > 0.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "demo offset must be positive, got {}",
                self.demo_offset_m
            )));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "min scale must be in (0, 1], got {}",
                self.min_scale
            )));
        }
        if !(self.field_of_view_deg > 0.0 && self.field_of_view_deg <= 360.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "field of view must be in (0, 360], got {}",
                self.field_of_view_deg
            )));
        }
        Ok(thresholds)
    }
}
