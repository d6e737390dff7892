//! Configuration lifecycle: load, serve, update, persist.
//!
//! # Data Flow
//! ```text
//! admin update (ConfigInput)
//!     → store.apply_update (validate + mutate under write lock)
//!     → rotor.reset (own lock, only when the pool changed)
//!     → snapshot + save (persist mutex, no store/rotor lock held)
//!     → UpdateOutcome { changed, persisted }
//! ```
//!
//! # Design Decisions
//! - The store lock is always released before the rotor lock is taken,
//!   and neither is held during the file write.
//! - A failed save is reported as `persisted: false` instead of rolling
//!   back memory; the divergence heals on the next successful save.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::error::ConfigError;
use crate::config::persistence;
use crate::config::schema::{ConfigInput, ConfigRecord};
use crate::config::store::ConfigStore;
use crate::rotation::SessionRotor;

/// Result of an administrative update.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Wire names of the fields the update applied.
    pub changed: Vec<&'static str>,
    /// Whether the new state reached disk.
    pub persisted: bool,
}

/// Owns the store, the rotor, and the configuration file path.
///
/// Constructed once at startup and injected into the HTTP layer; tests
/// build isolated instances against throwaway paths.
pub struct ConfigManager {
    store: Arc<ConfigStore>,
    rotor: Arc<SessionRotor>,
    path: PathBuf,
    persist_lock: Mutex<()>,
}

impl ConfigManager {
    /// Load `path` (bootstrapping defaults if needed) and build the manager.
    pub fn bootstrap(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = persistence::load_or_bootstrap(&path);
        Self::from_record(path, record)
    }

    /// Build the manager around an already-loaded record.
    pub fn from_record(path: impl Into<PathBuf>, record: ConfigRecord) -> Self {
        Self {
            store: Arc::new(ConfigStore::new(record)),
            rotor: Arc::new(SessionRotor::new()),
            path: path.into(),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Session token for the next outbound attempt.
    ///
    /// Rotates over the pool in order; fails with `OutOfRange` when the
    /// pool is empty or the position went stale under a concurrent swap.
    pub fn next_session(&self) -> Result<String, ConfigError> {
        let position = self.rotor.next(self.store.session_count());
        self.store.session_at(position)
    }

    /// Validate, apply, and persist a partial update.
    ///
    /// A validation failure leaves memory and disk untouched. On success
    /// the rotor is rewound when the pool was replaced, and the new state
    /// is saved unless nothing changed.
    pub fn update(&self, input: &ConfigInput) -> Result<UpdateOutcome, ConfigError> {
        let changed = self.store.apply_update(input)?;

        if changed.contains(&"sessions") {
            self.rotor.reset();
        }

        if changed.is_empty() {
            return Ok(UpdateOutcome {
                changed,
                persisted: true,
            });
        }

        let persisted = self.persist();
        tracing::info!(changed = ?changed, persisted, "Configuration updated");
        Ok(UpdateOutcome { changed, persisted })
    }

    /// Snapshot and save under the persist mutex.
    ///
    /// Concurrent updates serialize here, so the file always converges to
    /// the latest committed state.
    fn persist(&self) -> bool {
        let _guard = self.persist_lock.lock().expect("persist mutex poisoned");
        let snapshot = self.store.snapshot();
        match persistence::save(&self.path, &snapshot) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %err,
                    "Failed to persist configuration"
                );
                false
            }
        }
    }
}
