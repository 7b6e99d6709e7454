use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::geo::{GeoPoint, distance_meters, initial_bearing_degrees};
use crate::heading::HeadingSample;
use crate::placement::Placement;
use crate::proximity::{ProximityState, Thresholds};
use crate::sensor::SensorEvent;
use crate::target::{Target, TargetResolver};

/// Read-only view handed to the presentation layer after every update.
///
/// Distance, bearing and placement are `None` until both the user fix and
/// the target exist; they are never stale or zero-filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub proximity_state: ProximityState,
    pub distance_m: Option<f64>,
    pub bearing_deg: Option<f64>,
    pub angle_offset_deg: Option<f64>,
    pub placement_scale: Option<f64>,
    pub horizontal_fraction: Option<f64>,
    pub user_position: Option<GeoPoint>,
    pub heading_deg: Option<f64>,
    pub target: Option<Target>,
}

/// One-shot notifications raised by a recomputation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProximityEvent {
    Collected { distance_m: f64, target: GeoPoint },
}

/// Result of feeding one sensor update into a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub snapshot: Snapshot,
    pub event: Option<ProximityEvent>,
}

/// Proximity game state for one player and one target.
///
/// Not meant for concurrent use. Hosts that receive sensor events on
/// several threads must serialize calls (one lock, or one event loop).
#[derive(Clone, Debug)]
pub struct Session {
    config: EngineConfig,
    thresholds: Thresholds,
    user_position: Option<GeoPoint>,
    heading: Option<HeadingSample>,
    resolver: TargetResolver,
    state: ProximityState,
    distance_m: Option<f64>,
    bearing_deg: Option<f64>,
    collected_fired: bool,
}

impl Session {
    /// Create a session. Fails with `InvalidConfiguration` on bad
    /// thresholds and `InvalidPosition` on a bad explicit target.
    pub fn new(config: EngineConfig, explicit_target: Option<GeoPoint>) -> Result<Self> {
        let thresholds = config.validate()?;
        if let Some(t) = explicit_target
            && !t.is_valid()
        {
            return Err(EngineError::InvalidPosition {
                latitude: t.latitude,
                longitude: t.longitude,
            });
        }
        let mut session = Self {
            config,
            thresholds,
            user_position: None,
            heading: None,
            resolver: TargetResolver::new(explicit_target, config.demo_offset_m),
            state: ProximityState::Searching,
            distance_m: None,
            bearing_deg: None,
            collected_fired: false,
        };
        session.recompute();
        Ok(session)
    }

    /// Accept a raw position fix. Invalid input is rejected and the prior
    /// state is kept untouched.
    pub fn on_position_update(&mut self, latitude: f64, longitude: f64) -> Result<Update> {
        let fix = GeoPoint::new(latitude, longitude)?;
        self.user_position = Some(fix);
        let event = self.recompute();
        Ok(self.update(event))
    }

    /// Accept a raw heading reading. Non-finite readings are ignored.
    pub fn on_heading_update(&mut self, raw_degrees: f64, inverted: bool) -> Update {
        match HeadingSample::from_raw(raw_degrees, inverted) {
            Some(sample) => self.heading = Some(sample),
            None => tracing::debug!(raw_degrees, "ignoring non-finite heading"),
        }
        let event = self.recompute();
        self.update(event)
    }

    /// Dispatch a tagged sensor event.
    pub fn apply(&mut self, event: &SensorEvent) -> Result<Update> {
        match *event {
            SensorEvent::Position {
                latitude,
                longitude,
            } => self.on_position_update(latitude, longitude),
            SensorEvent::Heading { degrees, inverted } => {
                Ok(self.on_heading_update(degrees, inverted))
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let placement = match (self.distance_m, self.bearing_deg) {
            (Some(distance), Some(bearing)) => Some(Placement::compute(
                distance,
                bearing,
                self.heading.unwrap_or_else(HeadingSample::north).degrees,
                self.thresholds.visibility_m(),
                self.config.min_scale,
                self.config.field_of_view_deg,
            )),
            _ => None,
        };
        Snapshot {
            proximity_state: self.state,
            distance_m: self.distance_m,
            bearing_deg: self.bearing_deg,
            angle_offset_deg: placement.map(|p| p.angle_offset_deg),
            placement_scale: placement.map(|p| p.scale),
            horizontal_fraction: placement.map(|p| p.horizontal_fraction),
            user_position: self.user_position,
            heading_deg: self.heading.map(|h| h.degrees),
            target: self.resolver.current(),
        }
    }

    pub fn state(&self) -> ProximityState {
        self.state
    }

    pub fn user_position(&self) -> Option<GeoPoint> {
        self.user_position
    }

    pub fn target(&self) -> Option<Target> {
        self.resolver.current()
    }

    fn update(&self, event: Option<ProximityEvent>) -> Update {
        Update {
            snapshot: self.snapshot(),
            event,
        }
    }

    fn recompute(&mut self) -> Option<ProximityEvent> {
        let target = self.resolver.resolve(self.user_position, self.heading);

        match (self.user_position, target) {
            (Some(user), Some(target)) => {
                self.distance_m = Some(distance_meters(&user, &target.point));
                self.bearing_deg = Some(initial_bearing_degrees(&user, &target.point));
            }
            _ => {
                self.distance_m = None;
                self.bearing_deg = None;
            }
        }

        let previous = self.state;
        self.state = previous.advance(self.distance_m, &self.thresholds);
        if previous != self.state {
            tracing::debug!(
                from = ?previous,
                to = ?self.state,
                distance_m = ?self.distance_m,
                "proximity transition"
            );
        }

        if self.state.is_terminal() && !self.collected_fired {
            self.collected_fired = true;
            let distance_m = self.distance_m.unwrap_or_default();
            let target = target.map(|t| t.point)?;
            tracing::info!(distance_m, "target collected");
            return Some(ProximityEvent::Collected { distance_m, target });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::destination_point;
    use crate::target::TargetOrigin;

    const ASTANA: (f64, f64) = (51.1694, 71.4491);

    fn target() -> GeoPoint {
        GeoPoint::new(ASTANA.0, ASTANA.1).unwrap()
    }

    fn at_distance(d: f64) -> GeoPoint {
        destination_point(&target(), d, 200.0)
    }

    fn explicit_session() -> Session {
        Session::new(EngineConfig::default(), Some(target())).unwrap()
    }

    #[test]
    fn test_fresh_session_unknown() {
        let s = explicit_session();
        let snap = s.snapshot();
        assert_eq!(snap.proximity_state, ProximityState::Searching);
        assert!(snap.distance_m.is_none());
        assert!(snap.angle_offset_deg.is_none());
        assert!(snap.placement_scale.is_none());
        assert_eq!(snap.target.unwrap().origin, TargetOrigin::Explicit);
    }

    #[test]
    fn test_collection_sequence_fires_once() {
        let mut s = explicit_session();
        let mut states = Vec::new();
        let mut events = Vec::new();
        for d in [60.0, 30.0, 1.5] {
            let p = at_distance(d);
            let u = s.on_position_update(p.latitude, p.longitude).unwrap();
            states.push(u.snapshot.proximity_state);
            events.push(u.event);
        }
        assert_eq!(
            states,
            vec![
                ProximityState::Searching,
                ProximityState::Visible,
                ProximityState::Collected
            ]
        );
        assert!(events[0].is_none());
        assert!(events[1].is_none());
        assert!(matches!(events[2], Some(ProximityEvent::Collected { .. })));
    }

    #[test]
    fn test_collected_is_terminal_and_silent() {
        let mut s = explicit_session();
        let p = at_distance(1.0);
        let first = s.on_position_update(p.latitude, p.longitude).unwrap();
        assert!(first.event.is_some());

        let far = at_distance(1000.0);
        let u = s.on_position_update(far.latitude, far.longitude).unwrap();
        assert_eq!(u.snapshot.proximity_state, ProximityState::Collected);
        assert!(u.event.is_none());

        let again = s.on_position_update(p.latitude, p.longitude).unwrap();
        assert!(again.event.is_none());
    }

    #[test]
    fn test_invalid_position_keeps_prior_state() {
        let mut s = explicit_session();
        let p = at_distance(30.0);
        s.on_position_update(p.latitude, p.longitude).unwrap();
        let before = s.snapshot();

        let err = s.on_position_update(91.0, 0.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPosition { .. }));
        assert_eq!(s.user_position(), Some(p));
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_invalid_configuration() {
        let cfg = EngineConfig {
            collection_threshold_m: 50.0,
            visibility_threshold_m: 2.0,
            ..Default::default()
        };
        let err = Session::new(cfg, None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_invalid_explicit_target() {
        let bad = GeoPoint {
            latitude: 120.0,
            longitude: 0.0,
        };
        let err = Session::new(EngineConfig::default(), Some(bad)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPosition { .. }));
    }

    #[test]
    fn test_heading_only_stays_unknown() {
        let mut s = Session::new(EngineConfig::default(), None).unwrap();
        let u = s.on_heading_update(45.0, false);
        assert_eq!(u.snapshot.heading_deg, Some(45.0));
        assert!(u.snapshot.distance_m.is_none());
        assert!(u.snapshot.target.is_none());
        assert_eq!(u.snapshot.proximity_state, ProximityState::Searching);
    }

    #[test]
    fn test_demo_target_synthesized_once() {
        let mut s = Session::new(EngineConfig::default(), None).unwrap();
        s.on_heading_update(90.0, false);
        let u1 = s.on_position_update(ASTANA.0, ASTANA.1).unwrap();
        let t1 = u1.snapshot.target.unwrap();
        assert_eq!(t1.origin, TargetOrigin::Synthesized);
        assert!((u1.snapshot.distance_m.unwrap() - 3.0).abs() < 0.01);
        assert_eq!(u1.snapshot.proximity_state, ProximityState::Visible);

        let moved = destination_point(&target(), 20.0, 270.0);
        let u2 = s.on_position_update(moved.latitude, moved.longitude).unwrap();
        assert_eq!(u2.snapshot.target.unwrap(), t1);
    }

    #[test]
    fn test_placement_follows_heading() {
        let mut s = explicit_session();
        // Stand 20 m due south of the target, so it lies at bearing 0
        let p = destination_point(&target(), 20.0, 180.0);
        s.on_position_update(p.latitude, p.longitude).unwrap();

        let u = s.on_heading_update(10.0, false);
        let offset = u.snapshot.angle_offset_deg.unwrap();
        assert!((offset - (-10.0)).abs() < 0.01, "got {offset}");
        let scale = u.snapshot.placement_scale.unwrap();
        assert!((scale - 0.6).abs() < 0.01, "got {scale}");
    }

    #[test]
    fn test_nan_heading_ignored() {
        let mut s = explicit_session();
        s.on_heading_update(30.0, false);
        let u = s.on_heading_update(f64::NAN, false);
        assert_eq!(u.snapshot.heading_deg, Some(30.0));
    }

    #[test]
    fn test_apply_dispatch() {
        let mut s = explicit_session();
        let p = at_distance(10.0);
        let u = s
            .apply(&SensorEvent::Position {
                latitude: p.latitude,
                longitude: p.longitude,
            })
            .unwrap();
        assert_eq!(u.snapshot.proximity_state, ProximityState::Visible);
        let u = s
            .apply(&SensorEvent::Heading {
                degrees: 200.0,
                inverted: true,
            })
            .unwrap();
        assert_eq!(u.snapshot.heading_deg, Some(160.0));
    }
}
