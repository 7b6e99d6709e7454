//! Screen-space hints for the on-screen target marker.
//!
//! Only the signed angle and the scale are contractual. The horizontal
//! fraction is a convenience for hosts that map a camera field of view
//! linearly onto the screen width.

use serde::{Deserialize, Serialize};

use crate::geo::normalize_180;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Signed offset in (-180, 180]. Positive: target is right of facing.
    pub angle_offset_deg: f64,
    /// 0.5 is screen center; outside [0, 1] is off-screen.
    pub horizontal_fraction: f64,
    /// Marker scale in [min_scale, 1].
    pub scale: f64,
}

impl Placement {
    pub fn compute(
        distance_m: f64,
        bearing_deg: f64,
        heading_deg: f64,
        visibility_m: f64,
        min_scale: f64,
        field_of_view_deg: f64,
    ) -> Self {
        let angle_offset_deg = angle_offset(bearing_deg, heading_deg);
        Self {
            angle_offset_deg,
            horizontal_fraction: 0.5 + angle_offset_deg / field_of_view_deg,
            scale: placement_scale(distance_m, visibility_m, min_scale),
        }
    }

    pub fn is_on_screen(&self) -> bool {
        (0.0..=1.0).contains(&self.horizontal_fraction)
    }
}

/// How far right (positive) or left (negative) of the facing direction
/// the target lies.
pub fn angle_offset(bearing_deg: f64, heading_deg: f64) -> f64 {
    normalize_180(bearing_deg - heading_deg)
}

/// `max(min_scale, 1 - distance / visibility)`, capped at 1.
pub fn placement_scale(distance_m: f64, visibility_m: f64, min_scale: f64) -> f64 {
    (1.0 - distance_m / visibility_m).max(min_scale).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_offset_left() {
        assert!((angle_offset(350.0, 10.0) - (-20.0)).abs() < 1e-12);
    }

    #[test]
    fn test_angle_offset_right() {
        assert!((angle_offset(10.0, 350.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_offset_behind() {
        assert_eq!(angle_offset(180.0, 0.0), 180.0);
        assert_eq!(angle_offset(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_scale_shrinks_with_distance() {
        assert_eq!(placement_scale(0.0, 50.0, 0.2), 1.0);
        assert!((placement_scale(25.0, 50.0, 0.2) - 0.5).abs() < 1e-12);
        assert_eq!(placement_scale(45.0, 50.0, 0.2), 0.2);
        assert_eq!(placement_scale(500.0, 50.0, 0.2), 0.2);
    }

    #[test]
    fn test_compute_centered() {
        let p = Placement::compute(10.0, 90.0, 90.0, 50.0, 0.2, 60.0);
        assert_eq!(p.angle_offset_deg, 0.0);
        assert_eq!(p.horizontal_fraction, 0.5);
        assert!(p.is_on_screen());
    }

    #[test]
    fn test_compute_off_screen() {
        let p = Placement::compute(10.0, 180.0, 0.0, 50.0, 0.2, 60.0);
        assert!(!p.is_on_screen());
        let edge = Placement::compute(10.0, 30.0, 0.0, 50.0, 0.2, 60.0);
        assert_eq!(edge.horizontal_fraction, 1.0);
        assert!(edge.is_on_screen());
    }
}
