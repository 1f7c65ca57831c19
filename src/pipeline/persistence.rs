// Reads and writes the session file; the sequence itself is never saved,
// every run generates fresh patterns.
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::pipeline::session::SessionConfig;

pub const TICKGRID_DIR: &str = ".tickgrid";
const SESSION_FILE: &str = "session.json";
const LOG_FILE: &str = "tickgrid.log";

// <session_dir>/.tickgrid/session.json
pub fn session_file_path(session_dir: &Path) -> PathBuf {
    session_dir.join(TICKGRID_DIR).join(SESSION_FILE)
}

pub fn log_file_path(session_dir: &Path) -> PathBuf {
    session_dir.join(TICKGRID_DIR).join(LOG_FILE)
}

/// `Ok(None)` when there is no session file yet; a file that exists but
/// doesn't parse is an error rather than a silent fallback.
pub fn load_session(session_dir: &Path) -> anyhow::Result<Option<SessionConfig>> {
    let path = session_file_path(session_dir);
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(config))
}

// Save the session to disk, making the directory if it doesn't exist already
pub fn save_session(session_dir: &Path, config: &SessionConfig) -> anyhow::Result<PathBuf> {
    let path = session_file_path(session_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?; // create .tickgrid/ if needed
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
