use serde::{Deserialize, Serialize};

use crate::constants::{COORD_EPSILON_DEG, EARTH_RADIUS_M};
use crate::error::{EngineError, Result};

/// A latitude/longitude pair in degrees.
///
/// Construct through [`GeoPoint::new`] at input boundaries; the checked
/// constructor rejects NaN and out-of-range values instead of clamping.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < COORD_EPSILON_DEG
            && (self.longitude - other.longitude).abs() < COORD_EPSILON_DEG
    }
}

impl GeoPoint {
    /// Validated constructor. Fails with `InvalidPosition` on NaN or
    /// out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !is_valid(latitude, longitude) {
            return Err(EngineError::InvalidPosition {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Whether both coordinates are inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        is_valid(self.latitude, self.longitude)
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_meters(self, other)
    }

    /// Initial bearing towards `other`, degrees clockwise from north.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        initial_bearing_degrees(self, other)
    }
}

fn is_valid(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

/// Haversine great-circle distance in meters.
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // h can drift just above 1.0 for near-antipodal points
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Forward azimuth from `a` to `b` in [0, 360). Returns 0 when a == b.
pub fn initial_bearing_degrees(a: &GeoPoint, b: &GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_360(x.atan2(y).to_degrees())
}

/// Spherical direct problem: the point `distance_m` away from `origin`
/// along `bearing_deg`. Longitude is wrapped back into [-180, 180].
pub fn destination_point(origin: &GeoPoint, distance_m: f64, bearing_deg: f64) -> GeoPoint {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_d = delta.sin();
    let cos_d = delta.cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * theta.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon2 = lon1 + (theta.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());

    GeoPoint {
        latitude: lat2.to_degrees(),
        longitude: wrap_longitude(lon2.to_degrees()),
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    normalize_360(lon + 180.0) - 180.0
}

/// Wrap an angle into [0, 360).
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Wrap an angle into (-180, 180]. Positive means clockwise (to the right).
pub fn normalize_180(deg: f64) -> f64 {
    let r = normalize_360(deg + 180.0) - 180.0;
    if r <= -180.0 { 180.0 } else { r }
}
