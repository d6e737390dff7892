//! Configuration persistence to and from disk.
//!
//! # Data Flow
//! ```text
//! config.json
//!     → load (read & parse partial JSON)
//!     → normalize_record (defaults + overlay)
//!     → ConfigRecord (canonical)
//!
//! On save:
//!     ConfigRecord
//!     → pretty JSON
//!     → sibling .tmp file
//!     → rename over config.json
//! ```
//!
//! The adapter performs no locking. Callers serialize saves themselves; the
//! manager holds a dedicated persist mutex across snapshot + save.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::normalize::normalize_record;
use crate::config::schema::{ConfigInput, ConfigRecord};

/// Read and normalize the configuration file at `path`.
///
/// Missing fields are normal and fall back to defaults; a missing file or
/// malformed JSON is an error.
pub fn load(path: &Path) -> Result<ConfigRecord, ConfigError> {
    let content = fs::read_to_string(path)?;
    let input: ConfigInput = serde_json::from_str(&content)?;
    Ok(normalize_record(input))
}

/// Serialize `record` and atomically replace the file at `path`.
///
/// The record is written to a sibling `.tmp` file first and renamed into
/// place, so a crash mid-write leaves the previous file intact.
pub fn save(path: &Path, record: &ConfigRecord) -> Result<(), ConfigError> {
    let data = serde_json::to_string_pretty(record)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load `path`, falling back to defaults when the file is missing or
/// invalid. The fallback is written back immediately so later loads agree;
/// a write-back failure is logged and the in-memory defaults are used as-is.
pub fn load_or_bootstrap(path: &Path) -> ConfigRecord {
    match load(path) {
        Ok(record) => {
            tracing::info!(
                path = %path.display(),
                sessions = record.sessions.len(),
                "Configuration loaded"
            );
            record
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "Using default configuration"
            );
            let record = ConfigRecord::default();
            if let Err(err) = save(path, &record) {
                tracing::error!(
                    path = %path.display(),
                    error = %err,
                    "Failed to write default configuration"
                );
            }
            record
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
