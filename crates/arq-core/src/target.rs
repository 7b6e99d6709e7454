use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, destination_point};
use crate::heading::HeadingSample;

/// How a target came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOrigin {
    /// Supplied up front, e.g. from a quest task.
    Explicit,
    /// Projected once from the first user fix (demo mode).
    Synthesized,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub point: GeoPoint,
    pub origin: TargetOrigin,
}

/// Resolves the session target and caches it for the session's lifetime.
///
/// With an explicit target the resolver returns it unchanged. Without one,
/// the first user fix seeds a synthesized target `demo_offset_m` ahead
/// along the current heading (north when unknown). Later fixes never move it.
#[derive(Clone, Debug)]
pub struct TargetResolver {
    resolved: Option<Target>,
    demo_offset_m: f64,
}

impl TargetResolver {
    pub fn new(explicit: Option<GeoPoint>, demo_offset_m: f64) -> Self {
        Self {
            resolved: explicit.map(|point| Target {
                point,
                origin: TargetOrigin::Explicit,
            }),
            demo_offset_m,
        }
    }

    /// Current target, or `None` while pending.
    pub fn resolve(
        &mut self,
        user_fix: Option<GeoPoint>,
        heading: Option<HeadingSample>,
    ) -> Option<Target> {
        if self.resolved.is_none()
            && let Some(fix) = user_fix
        {
            let bearing = heading.unwrap_or_else(HeadingSample::north).degrees;
            let point = destination_point(&fix, self.demo_offset_m, bearing);
            tracing::debug!(
                lat = point.latitude,
                lng = point.longitude,
                bearing,
                "synthesized demo target"
            );
            self.resolved = Some(Target {
                point,
                origin: TargetOrigin::Synthesized,
            });
        }
        self.resolved
    }

    /// Target without triggering synthesis.
    pub fn current(&self) -> Option<Target> {
        self.resolved
    }
}
