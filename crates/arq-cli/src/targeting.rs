//! Choosing the session target from CLI flags or tool arguments.

use anyhow::{Context, Result, bail};
use arq_catalog::{Catalog, parse_ar_link};
use arq_core::GeoPoint;

/// Where a session's explicit target comes from. All `None` means demo mode.
#[derive(Debug, Default)]
pub struct TargetChoice<'a> {
    pub link: Option<&'a str>,
    pub quest: Option<&'a str>,
    pub task: Option<&'a str>,
    pub point: Option<GeoPoint>,
}

pub fn select_target(catalog: &Catalog, choice: &TargetChoice<'_>) -> Result<Option<GeoPoint>> {
    let sources = [
        choice.link.is_some(),
        choice.quest.is_some() || choice.task.is_some(),
        choice.point.is_some(),
    ]
    .iter()
    .filter(|s| **s)
    .count();
    if sources > 1 {
        bail!("choose only one of: link, quest/task, explicit target");
    }

    if let Some(link) = choice.link {
        return parse_ar_link(link).with_context(|| format!("bad AR link {link:?}"));
    }

    match (choice.quest, choice.task) {
        (Some(quest), Some(task_id)) => {
            let task = catalog
                .find_task(quest, task_id)
                .with_context(|| format!("no task '{task_id}' in quest '{quest}'"))?;
            match task.target() {
                Some(point) => Ok(Some(point)),
                None => bail!("task '{quest}/{task_id}' has no location for the AR view"),
            }
        }
        (None, None) => Ok(choice.point),
        _ => bail!("quest and task must be given together"),
    }
}

/// Parse `lat,lng` as used by command-line point arguments.
pub fn parse_point(s: &str) -> std::result::Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("latitude is not a number: {lat:?}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("longitude is not a number: {lng:?}"))?;
    GeoPoint::new(lat, lng).map_err(|e| e.to_string())
}
