use std::fmt;
use std::path::PathBuf;

use arq_core::EngineError;

#[derive(Debug)]
pub enum CatalogError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    InvalidData(String),
    Engine(EngineError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            CatalogError::Parse(e) => write!(f, "TOML parse error: {e}"),
            CatalogError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            CatalogError::Engine(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<toml::de::Error> for CatalogError {
    fn from(e: toml::de::Error) -> Self {
        CatalogError::Parse(e)
    }
}

impl From<EngineError> for CatalogError {
    fn from(e: EngineError) -> Self {
        CatalogError::Engine(e)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
