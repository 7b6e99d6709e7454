use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Where the player stands relative to the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProximityState {
    /// Distance unknown or beyond the visibility threshold.
    #[default]
    Searching,
    /// Within the visibility threshold, not yet collected.
    Visible,
    /// Terminal. Reached the collection threshold at least once.
    Collected,
}

/// Validated collection/visibility distances in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    collection_m: f64,
    visibility_m: f64,
}

impl Thresholds {
    pub fn new(collection_m: f64, visibility_m: f64) -> Result<Self> {
        if !(collection_m.is_finite() && collection_m > 0.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "collection threshold must be positive, got {collection_m}"
            )));
        }
        if !(visibility_m.is_finite() && visibility_m > 0.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "visibility threshold must be positive, got {visibility_m}"
            )));
        }
        if collection_m >= visibility_m {
            return Err(EngineError::InvalidConfiguration(format!(
                "collection threshold ({collection_m} m) must be below visibility threshold ({visibility_m} m)"
            )));
        }
        Ok(Self {
            collection_m,
            visibility_m,
        })
    }

    pub fn collection_m(&self) -> f64 {
        self.collection_m
    }

    pub fn visibility_m(&self) -> f64 {
        self.visibility_m
    }
}

impl ProximityState {
    /// One step of the proximity state machine.
    ///
    /// `distance_m` is `None` while either the user fix or the target is
    /// pending. Collected never transitions out.
    pub fn advance(self, distance_m: Option<f64>, thresholds: &Thresholds) -> Self {
        if self == ProximityState::Collected {
            return self;
        }
        match distance_m {
            None => ProximityState::Searching,
            Some(d) if d <= thresholds.collection_m => ProximityState::Collected,
            Some(d) if d <= thresholds.visibility_m => ProximityState::Visible,
            Some(_) => ProximityState::Searching,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ProximityState::Collected
    }
}
