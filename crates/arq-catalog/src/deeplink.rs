//! AR view deep links of the form `/ar?lat=<lat>&lng=<lng>`.
//!
//! A link without coordinates opens the AR view in demo mode, where the
//! engine synthesizes its own target.

use arq_core::GeoPoint;

use crate::error::{CatalogError, Result};

/// Build the deep link for a target.
pub fn ar_link(point: &GeoPoint) -> String {
    format!("/ar?lat={}&lng={}", point.latitude, point.longitude)
}

/// Extract the explicit target from an AR deep link.
///
/// Accepts a bare query (`lat=..&lng=..`), a path (`/ar?..`) or a full
/// URL. Returns `Ok(None)` when neither parameter is present. A lone
/// parameter, an unparsable number, or an out-of-range coordinate is an
/// error.
pub fn parse_ar_link(link: &str) -> Result<Option<GeoPoint>> {
    let without_fragment = link.split('#').next().unwrap_or_default();
    let query = match without_fragment.split_once('?') {
        Some((_, q)) => q,
        None if without_fragment.contains('=') => without_fragment,
        None => "",
    };

    let mut lat = None;
    let mut lng = None;
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "lat" => lat = Some(parse_coord("lat", value)?),
            "lng" => lng = Some(parse_coord("lng", value)?),
            _ => {}
        }
    }

    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => Ok(Some(GeoPoint::new(lat, lng)?)),
        _ => Err(CatalogError::InvalidData(format!(
            "AR link needs both lat and lng: {link}"
        ))),
    }
}

fn parse_coord(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CatalogError::InvalidData(format!("{key} is not a number: {value:?}")))
}
