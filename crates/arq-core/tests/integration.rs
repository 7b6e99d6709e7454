//! Integration tests exercising the engine end to end:
//! sensor events → session → snapshot/events, plus geodesy properties.

use approx::assert_relative_eq;
use arq_core::{
    EngineConfig, EngineError, GeoPoint, HeadingReading, PositionFix, ProximityEvent,
    ProximityState, ScriptedSource, Session, TargetOrigin, destination_point, distance_meters,
    drive, initial_bearing_degrees, normalize_180, parse_trace,
};
use proptest::prelude::*;

const BAITEREK: (f64, f64) = (51.1283, 71.4305);

fn baiterek() -> GeoPoint {
    GeoPoint::new(BAITEREK.0, BAITEREK.1).unwrap()
}

fn lat() -> impl Strategy<Value = f64> {
    -89.0..89.0f64
}

fn lng() -> impl Strategy<Value = f64> {
    -179.0..179.0f64
}

proptest! {
    #[test]
    fn distance_is_symmetric(a_lat in lat(), a_lng in lng(), b_lat in lat(), b_lng in lng()) {
        let a = GeoPoint::new(a_lat, a_lng).unwrap();
        let b = GeoPoint::new(b_lat, b_lng).unwrap();
        let ab = distance_meters(&a, &b);
        let ba = distance_meters(&b, &a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0), "{ab} vs {ba}");
    }

    #[test]
    fn distance_to_self_is_zero(a_lat in lat(), a_lng in lng()) {
        let a = GeoPoint::new(a_lat, a_lng).unwrap();
        prop_assert_eq!(distance_meters(&a, &a), 0.0);
    }

    #[test]
    fn projection_roundtrip(
        o_lat in -80.0..80.0f64,
        o_lng in lng(),
        d in 1.0..10_000.0f64,
        b in 0.0..360.0f64,
    ) {
        let origin = GeoPoint::new(o_lat, o_lng).unwrap();
        let dest = destination_point(&origin, d, b);
        prop_assert!(dest.is_valid());
        let back = distance_meters(&origin, &dest);
        prop_assert!((back - d).abs() < d * 1e-3, "asked {d}, got {back}");
    }

    #[test]
    fn bearing_in_range(a_lat in lat(), a_lng in lng(), b_lat in lat(), b_lng in lng()) {
        let a = GeoPoint::new(a_lat, a_lng).unwrap();
        let b = GeoPoint::new(b_lat, b_lng).unwrap();
        let bearing = initial_bearing_degrees(&a, &b);
        prop_assert!((0.0..360.0).contains(&bearing));
    }

    #[test]
    fn normalize_180_range(x in -10_000.0..10_000.0f64) {
        let r = normalize_180(x);
        prop_assert!(r > -180.0 && r <= 180.0, "{x} -> {r}");
    }
}

#[test]
fn projection_five_meters_east_of_astana() {
    let origin = GeoPoint::new(51.1694, 71.4491).unwrap();
    let dest = destination_point(&origin, 5.0, 90.0);
    assert_relative_eq!(distance_meters(&origin, &dest), 5.0, epsilon = 0.05);
}

#[test]
fn angle_offset_bearing_350_heading_10() {
    assert_relative_eq!(normalize_180(350.0 - 10.0), -20.0, epsilon = 1e-12);
}

/// Walk towards an explicit quest target from 120 m out and collect it.
#[test]
fn walk_to_quest_target() {
    let target = baiterek();
    let mut session = Session::new(EngineConfig::default(), Some(target)).unwrap();

    let fixes: Vec<PositionFix> = [120.0, 80.0, 45.0, 20.0, 5.0, 1.0, 0.5]
        .iter()
        .map(|&d| {
            let p = destination_point(&target, d, 135.0);
            PositionFix {
                latitude: p.latitude,
                longitude: p.longitude,
            }
        })
        .collect();
    let mut positions = ScriptedSource::new(fixes);
    let mut headings = ScriptedSource::new([HeadingReading {
        degrees: 45.0,
        inverted: false,
    }]);

    let results = drive(&mut session, &mut positions, &mut headings);
    let updates: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
    // One heading plus seven fixes
    assert_eq!(updates.len(), 8);

    let states: Vec<_> = updates[1..]
        .iter()
        .map(|u| u.snapshot.proximity_state)
        .collect();
    assert_eq!(
        states,
        vec![
            ProximityState::Searching,
            ProximityState::Searching,
            ProximityState::Visible,
            ProximityState::Visible,
            ProximityState::Visible,
            ProximityState::Collected,
            ProximityState::Collected,
        ]
    );

    let collected: Vec<_> = updates.iter().filter_map(|u| u.event).collect();
    assert_eq!(collected.len(), 1);
    let ProximityEvent::Collected { distance_m, target: t } = collected[0];
    assert!(distance_m <= 2.0);
    assert_eq!(t, target);

    // Facing 45° while the target lies at bearing ~315° from the southeast
    let offset = updates[4].snapshot.angle_offset_deg.unwrap();
    assert_relative_eq!(offset, -90.0, epsilon = 0.1);
}

#[test]
fn demo_session_from_trace() {
    let trace = r#"
{"type":"heading","degrees":270.0,"inverted":true}
{"type":"position","latitude":51.1694,"longitude":71.4491}
{"type":"position","latitude":91.0,"longitude":71.4491}
{"type":"position","latitude":51.1695,"longitude":71.4491}
"#;
    let events = parse_trace(trace).unwrap();
    let mut session = Session::new(EngineConfig::default(), None).unwrap();

    let first = session.apply(&events[0]).unwrap();
    assert_eq!(first.snapshot.heading_deg, Some(90.0));
    assert!(first.snapshot.target.is_none());

    let second = session.apply(&events[1]).unwrap();
    let target = second.snapshot.target.unwrap();
    assert_eq!(target.origin, TargetOrigin::Synthesized);
    let origin = GeoPoint::new(51.1694, 71.4491).unwrap();
    assert_relative_eq!(
        initial_bearing_degrees(&origin, &target.point),
        90.0,
        epsilon = 0.01
    );

    let err = session.apply(&events[2]).unwrap_err();
    assert!(matches!(err, EngineError::InvalidPosition { .. }));
    assert_eq!(session.user_position(), Some(origin));

    let fourth = session.apply(&events[3]).unwrap();
    assert_eq!(fourth.snapshot.target.unwrap(), target);
}

#[test]
fn small_demo_thresholds() {
    let config = EngineConfig {
        collection_threshold_m: 3.0,
        visibility_threshold_m: 5.0,
        demo_offset_m: 4.0,
        ..Default::default()
    };
    let mut session = Session::new(config, None).unwrap();
    let u = session.on_position_update(43.2389, 76.8897).unwrap();
    assert_eq!(u.snapshot.proximity_state, ProximityState::Visible);
    assert!(u.event.is_none());
}
