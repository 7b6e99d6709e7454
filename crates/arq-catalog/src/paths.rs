use std::env;
use std::path::PathBuf;

/// File name looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "arquest.toml";

/// `$HOME/.arquest`, falling back to the current directory without a home.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".arquest")
}

/// `ARQ_DATA_DIR` if set, else [`default_base_dir`].
pub fn resolve_base_dir() -> PathBuf {
    env::var("ARQ_DATA_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_base_dir)
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
