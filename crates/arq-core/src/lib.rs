//! AR quest proximity engine.
//!
//! Turns a stream of position fixes and compass readings into a
//! hidden/visible/collected game state for a single geographic target,
//! plus screen placement hints for an on-screen marker.
//!
//! Zero I/O. Spherical geodesy and a small threshold state machine; the
//! host owns sensors, rendering, and the session's lifetime.

pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod heading;
pub mod placement;
pub mod proximity;
pub mod sensor;
pub mod session;
pub mod target;
pub mod trace;

pub use config::EngineConfig;
pub use constants::{
    COORD_EPSILON_DEG, DEFAULT_COLLECTION_THRESHOLD_M, DEFAULT_DEMO_OFFSET_M,
    DEFAULT_FIELD_OF_VIEW_DEG, DEFAULT_MIN_SCALE, DEFAULT_VISIBILITY_THRESHOLD_M, EARTH_RADIUS_M,
};
pub use error::{EngineError, Result};
pub use geo::{
    GeoPoint, destination_point, distance_meters, initial_bearing_degrees, normalize_180,
    normalize_360,
};
pub use heading::HeadingSample;
pub use placement::{Placement, angle_offset, placement_scale};
pub use proximity::{ProximityState, Thresholds};
pub use sensor::{
    HeadingReading, HeadingSource, PositionFix, PositionSource, ScriptedSource, SensorEvent, drive,
};
pub use session::{ProximityEvent, Session, Snapshot, Update};
pub use target::{Target, TargetOrigin, TargetResolver};
pub use trace::{TraceError, encode_trace, parse_trace, snapshot_json};
