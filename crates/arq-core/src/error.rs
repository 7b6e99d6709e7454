use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Coordinate outside [-90,90] x [-180,180] or not a number.
    InvalidPosition { latitude: f64, longitude: f64 },
    /// Threshold ordering or positivity violated.
    InvalidConfiguration(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPosition {
                latitude,
                longitude,
            } => write!(f, "invalid position: lat={latitude}, lng={longitude}"),
            EngineError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
