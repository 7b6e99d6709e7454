use serde::{Deserialize, Serialize};

use crate::geo::normalize_360;

/// Device facing direction, degrees clockwise from north in [0, 360).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadingSample {
    pub degrees: f64,
}

impl HeadingSample {
    /// Canonicalize a raw sensor reading.
    ///
    /// `inverted` marks platforms whose compass property grows
    /// counter-clockwise; those readings are mirrored as `360 - raw`.
    /// Returns `None` for non-finite input.
    pub fn from_raw(raw: f64, inverted: bool) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let degrees = if inverted {
            normalize_360(360.0 - raw)
        } else {
            normalize_360(raw)
        };
        Some(Self { degrees })
    }

    /// Assumed facing direction while no reading has arrived.
    pub fn north() -> Self {
        Self { degrees: 0.0 }
    }
}
