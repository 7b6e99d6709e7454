/// Mean Earth radius in meters (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Tolerance in degrees for treating two coordinates as the same point.
pub const COORD_EPSILON_DEG: f64 = 1e-9;

/// Distance at or below which a target counts as collected.
pub const DEFAULT_COLLECTION_THRESHOLD_M: f64 = 2.0;

/// Distance at or below which a target is shown on screen.
pub const DEFAULT_VISIBILITY_THRESHOLD_M: f64 = 50.0;

/// How far in front of the first fix a demo target is placed.
pub const DEFAULT_DEMO_OFFSET_M: f64 = 3.0;

/// Smallest marker scale, reached at the visibility threshold.
pub const DEFAULT_MIN_SCALE: f64 = 0.2;

/// Horizontal camera field of view used for marker placement.
pub const DEFAULT_FIELD_OF_VIEW_DEG: f64 = 60.0;
