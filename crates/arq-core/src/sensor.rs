//! Sensor ports.
//!
//! Position fixes and heading readings come from two independent sources
//! with unrelated cadences. Hosts implement [`PositionSource`] and
//! [`HeadingSource`] over whatever platform API they have; the engine only
//! sees the resulting [`SensorEvent`]s.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::{Session, Update};

/// One inbound sensor update, tagged by kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorEvent {
    Position {
        latitude: f64,
        longitude: f64,
    },
    Heading {
        degrees: f64,
        #[serde(default)]
        inverted: bool,
    },
}

/// Raw position fix as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw compass reading and its platform convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingReading {
    pub degrees: f64,
    pub inverted: bool,
}

pub trait PositionSource {
    /// Next pending fix, or `None` if nothing is available right now.
    fn next_fix(&mut self) -> Option<PositionFix>;
}

pub trait HeadingSource {
    /// Next pending reading, or `None` if nothing is available right now.
    fn next_heading(&mut self) -> Option<HeadingReading>;
}

/// In-memory source replaying a fixed list of readings.
#[derive(Clone, Debug)]
pub struct ScriptedSource<T> {
    pending: VecDeque<T>,
}

impl<T> Default for ScriptedSource<T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<T> ScriptedSource<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            pending: items.into_iter().collect(),
        }
    }

    pub fn push(&mut self, item: T) {
        self.pending.push_back(item);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl PositionSource for ScriptedSource<PositionFix> {
    fn next_fix(&mut self) -> Option<PositionFix> {
        self.pending.pop_front()
    }
}

impl HeadingSource for ScriptedSource<HeadingReading> {
    fn next_heading(&mut self) -> Option<HeadingReading> {
        self.pending.pop_front()
    }
}

impl From<PositionFix> for SensorEvent {
    fn from(fix: PositionFix) -> Self {
        SensorEvent::Position {
            latitude: fix.latitude,
            longitude: fix.longitude,
        }
    }
}

impl From<HeadingReading> for SensorEvent {
    fn from(reading: HeadingReading) -> Self {
        SensorEvent::Heading {
            degrees: reading.degrees,
            inverted: reading.inverted,
        }
    }
}

/// Drain both sources into `session`.
///
/// Each round takes at most one heading and then at most one fix, until
/// both sources report nothing. Rejected fixes are returned in place as
/// errors; they do not stop the drain.
pub fn drive(
    session: &mut Session,
    positions: &mut impl PositionSource,
    headings: &mut impl HeadingSource,
) -> Vec<Result<Update>> {
    let mut results = Vec::new();
    loop {
        let heading = headings.next_heading();
        let fix = positions.next_fix();
        if heading.is_none() && fix.is_none() {
            break;
        }
        if let Some(reading) = heading {
            results.push(session.apply(&reading.into()));
        }
        if let Some(fix) = fix {
            results.push(session.apply(&fix.into()));
        }
    }
    results
}
