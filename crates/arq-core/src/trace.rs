//! JSON Lines encoding for recorded sensor traces.
//!
//! One [`SensorEvent`] per line. Blank lines and lines starting with `#`
//! are skipped so traces can be annotated by hand.

use std::fmt;

use crate::sensor::SensorEvent;
use crate::session::Snapshot;

#[derive(Debug)]
pub struct TraceError {
    /// 1-based line number of the offending record.
    pub line: usize,
    pub source: serde_json::Error,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trace line {}: {}", self.line, self.source)
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Parse a JSON Lines trace.
pub fn parse_trace(input: &str) -> Result<Vec<SensorEvent>, TraceError> {
    let mut events = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(trimmed).map_err(|source| TraceError {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Encode events as JSON Lines, newline-terminated.
pub fn encode_trace(events: &[SensorEvent]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}

/// Compact single-line JSON for a snapshot.
pub fn snapshot_json(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = r#"
# walk towards Baiterek
{"type":"heading","degrees":45.0}
{"type":"position","latitude":51.1280,"longitude":71.4300}

{"type":"heading","degrees":200.0,"inverted":true}
"#;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let events = parse_trace(TRACE).unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], SensorEvent::Position { .. }));
    }

    #[test]
    fn test_parse_reports_line() {
        let err = parse_trace("{\"type\":\"heading\",\"degrees\":1}\nnot json\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.to_string().starts_with("trace line 2:"));
    }

    #[test]
    fn test_parse_unknown_type() {
        assert!(parse_trace(r#"{"type":"camera"}"#).is_err());
    }

    #[test]
    fn test_encode_then_parse() {
        let events = parse_trace(TRACE).unwrap();
        let encoded = encode_trace(&events).unwrap();
        assert_eq!(encoded.lines().count(), 3);
        assert_eq!(parse_trace(&encoded).unwrap(), events);
    }
}
