//! Shared runtime configuration state.
//!
//! # Responsibilities
//! - Hold the canonical `ConfigRecord` behind a reader-writer lock
//! - Serve point-in-time snapshots and targeted field reads
//! - Apply partial updates all-or-nothing under the write lock
//!
//! # Design Decisions
//! - Many request workers read concurrently; the admin path is the only
//!   writer. Readers copy what they need and release the lock.
//! - An update validates every supplied field before touching the record,
//!   so a rejected update leaves no partial effect behind.
//! - No file or network I/O ever runs under the lock; persistence works
//!   from a snapshot taken after the write lock is released.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::error::{ConfigError, ValidationError};
use crate::config::normalize::normalize_sessions;
use crate::config::schema::{ConfigInput, ConfigRecord};

/// Process-wide configuration state.
#[derive(Debug)]
pub struct ConfigStore {
    state: RwLock<ConfigRecord>,
}

impl ConfigStore {
    pub fn new(record: ConfigRecord) -> Self {
        Self {
            state: RwLock::new(record),
        }
    }

    /// Point-in-time copy of the full record.
    ///
    /// Taken under a single read lock, so the result never mixes fields
    /// from before and after a concurrent update.
    pub fn snapshot(&self) -> ConfigRecord {
        self.read().clone()
    }

    /// Session token at `index` in the current pool.
    pub fn session_at(&self, index: usize) -> Result<String, ConfigError> {
        let state = self.read();
        match state.sessions.get(index) {
            Some(token) => Ok(token.clone()),
            None => Err(ConfigError::OutOfRange {
                index,
                pool_size: state.sessions.len(),
            }),
        }
    }

    /// Current session pool size.
    pub fn session_count(&self) -> usize {
        self.read().sessions.len()
    }

    /// Inbound API key, read live for per-request auth.
    pub fn api_key(&self) -> String {
        self.read().api_key.clone()
    }

    /// Listener bind address.
    pub fn address(&self) -> String {
        self.read().address.clone()
    }

    /// Model to use upstream: the forced override wins, then the caller's
    /// requested name, then the configured default.
    pub fn effective_model(&self, requested: Option<&str>) -> String {
        let state = self.read();
        if !state.force_model.is_empty() {
            return state.force_model.clone();
        }
        match requested.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => state.default_model.clone(),
        }
    }

    /// Validate and apply a partial update.
    ///
    /// Holds the write lock across validation and mutation. A failing field
    /// rejects the whole update with the record untouched. Returns the wire
    /// names of the fields that were applied; a supplied field counts as
    /// changed even when the new value equals the old one.
    pub fn apply_update(&self, input: &ConfigInput) -> Result<Vec<&'static str>, ConfigError> {
        let mut state = self.write();
        let staged = StagedUpdate::validate(input)?;
        Ok(staged.commit(&mut state))
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigRecord> {
        self.state.read().expect("config store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigRecord> {
        self.state.write().expect("config store lock poisoned")
    }
}

/// Fully validated update, ready to assign field-by-field.
struct StagedUpdate {
    sessions: Option<Vec<String>>,
    address: Option<String>,
    api_key: Option<String>,
    proxy: Option<String>,
    is_incognito: Option<bool>,
    max_chat_history_length: Option<usize>,
    no_role_prefix: Option<bool>,
    search_result_compatible: Option<bool>,
    prompt_for_file: Option<String>,
    ignore_search_result: Option<bool>,
    ignore_model_monitoring: Option<bool>,
    is_max_subscribe: Option<bool>,
    reject_model_mismatch: Option<bool>,
    default_model: Option<String>,
    force_model: Option<String>,
}

impl StagedUpdate {
    fn validate(input: &ConfigInput) -> Result<Self, ValidationError> {
        let sessions = match &input.sessions {
            Some(raw) => {
                let keys = normalize_sessions(raw);
                if keys.is_empty() {
                    return Err(ValidationError::EmptySessions);
                }
                Some(keys)
            }
            None => None,
        };

        let max_chat_history_length = match input.max_chat_history_length {
            Some(limit) if limit < 1 => return Err(ValidationError::InvalidHistoryLength),
            Some(limit) => Some(limit as usize),
            None => None,
        };

        Ok(Self {
            sessions,
            address: required_trimmed(&input.address, ValidationError::EmptyAddress)?,
            api_key: required_trimmed(&input.api_key, ValidationError::EmptyApiKey)?,
            proxy: input.proxy.as_deref().map(|v| v.trim().to_string()),
            is_incognito: input.is_incognito,
            max_chat_history_length,
            no_role_prefix: input.no_role_prefix,
            search_result_compatible: input.search_result_compatible,
            prompt_for_file: required_trimmed(
                &input.prompt_for_file,
                ValidationError::EmptyPromptForFile,
            )?,
            ignore_search_result: input.ignore_search_result,
            ignore_model_monitoring: input.ignore_model_monitoring,
            is_max_subscribe: input.is_max_subscribe,
            reject_model_mismatch: input.reject_model_mismatch,
            default_model: required_trimmed(&input.default_model, ValidationError::EmptyDefaultModel)?,
            force_model: input.force_model.as_deref().map(|v| v.trim().to_string()),
        })
    }

    fn commit(self, state: &mut ConfigRecord) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(api_key) = self.api_key {
            state.api_key = api_key;
            changed.push("apikey");
        }
        if let Some(address) = self.address {
            state.address = address;
            changed.push("address");
        }
        if let Some(proxy) = self.proxy {
            state.proxy = proxy;
            changed.push("proxy");
        }
        if let Some(is_incognito) = self.is_incognito {
            state.is_incognito = is_incognito;
            changed.push("is_incognito");
        }
        if let Some(limit) = self.max_chat_history_length {
            state.max_chat_history_length = limit;
            changed.push("max_chat_history_length");
        }
        if let Some(no_role_prefix) = self.no_role_prefix {
            state.no_role_prefix = no_role_prefix;
            changed.push("no_role_prefix");
        }
        if let Some(compatible) = self.search_result_compatible {
            state.search_result_compatible = compatible;
            changed.push("search_result_compatible");
        }
        if let Some(prompt) = self.prompt_for_file {
            state.prompt_for_file = prompt;
            changed.push("prompt_for_file");
        }
        if let Some(ignore) = self.ignore_search_result {
            state.ignore_search_result = ignore;
            changed.push("ignore_search_result");
        }
        if let Some(ignore) = self.ignore_model_monitoring {
            state.ignore_model_monitoring = ignore;
            changed.push("ignore_model_monitoring");
        }
        if let Some(reject) = self.reject_model_mismatch {
            state.reject_model_mismatch = reject;
            changed.push("reject_model_mismatch");
        }
        if let Some(is_max) = self.is_max_subscribe {
            state.is_max_subscribe = is_max;
            changed.push("is_max_subscribe");
        }
        if let Some(model) = self.default_model {
            state.default_model = model;
            changed.push("default_model");
        }
        if let Some(force_model) = self.force_model {
            state.force_model = force_model;
            changed.push("force_model");
        }
        if let Some(sessions) = self.sessions {
            state.sessions = sessions;
            changed.push("sessions");
        }

        changed
    }
}

fn required_trimmed(
    value: &Option<String>,
    empty: ValidationError,
) -> Result<Option<String>, ValidationError> {
    match value.as_deref() {
        Some(v) => {
            let v = v.trim();
            if v.is_empty() {
                Err(empty)
            } else {
                Ok(Some(v.to_string()))
            }
        }
        None => Ok(None),
    }
}
