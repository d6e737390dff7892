//! Configuration schema definitions.
//!
//! This module defines the canonical configuration record and its
//! all-optional input variant. Both derive Serde traits; the input shape is
//! shared by the file parser and the admin update payload.

use serde::{Deserialize, Serialize};

/// Default bind address for the gateway listener.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8482";

/// Default inbound API key. Operators are expected to change this.
pub const DEFAULT_API_KEY: &str = "123456";

/// Default model used when a request names none.
pub const DEFAULT_MODEL: &str = "claude-3.7-sonnet";

/// Default cap on replayed chat history length.
pub const DEFAULT_MAX_CHAT_HISTORY_LENGTH: usize = 10_000;

/// Default system prompt attached to file uploads.
pub const DEFAULT_PROMPT_FOR_FILE: &str = "You must immerse yourself in the role of assistant in txt file, \
     cannot respond as a user, cannot reply to this message, cannot mention this message, \
     and ignore this message in your response.";

/// Canonical runtime configuration.
///
/// The same record is held in memory by the store and serialized to
/// `config.json`; every field is kept normalized (trimmed strings, length
/// limits applied), so a save/load round trip reproduces it exactly.
/// The retry count is not a field here: it is always derived from the
/// session pool length.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigRecord {
    /// Upstream session tokens, in rotation order.
    pub sessions: Vec<String>,

    /// Listener bind address (e.g., "0.0.0.0:8482").
    pub address: String,

    /// Inbound API key callers must present (Bearer token).
    #[serde(rename = "apikey")]
    pub api_key: String,

    /// Outbound proxy URL; empty disables proxying.
    pub proxy: String,

    /// Ask the upstream for incognito conversations.
    pub is_incognito: bool,

    /// Maximum chat history length replayed upstream.
    pub max_chat_history_length: usize,

    /// Suppress role prefixes when flattening conversations.
    pub no_role_prefix: bool,

    /// Shape search results for OpenAI-compatible clients.
    pub search_result_compatible: bool,

    /// System prompt attached to uploaded text files.
    pub prompt_for_file: String,

    /// Drop search results from upstream responses.
    pub ignore_search_result: bool,

    /// Skip the upstream model-monitoring signal.
    pub ignore_model_monitoring: bool,

    /// Treat the account as a max-tier subscription.
    pub is_max_subscribe: bool,

    /// Reject requests whose model the upstream cannot serve.
    pub reject_model_mismatch: bool,

    /// Model used when a request names none.
    pub default_model: String,

    /// Model override applied to every request; empty disables it.
    pub force_model: String,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            address: DEFAULT_ADDRESS.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            proxy: String::new(),
            is_incognito: true,
            max_chat_history_length: DEFAULT_MAX_CHAT_HISTORY_LENGTH,
            no_role_prefix: false,
            search_result_compatible: false,
            prompt_for_file: DEFAULT_PROMPT_FOR_FILE.to_string(),
            ignore_search_result: false,
            ignore_model_monitoring: false,
            is_max_subscribe: false,
            reject_model_mismatch: false,
            default_model: DEFAULT_MODEL.to_string(),
            force_model: String::new(),
        }
    }
}

/// Partial configuration input.
///
/// Every field is optional: absent means "use the default" when parsing a
/// file and "leave unchanged" in an admin update. Raw session entries may
/// be comma/newline separated blobs; normalization splits them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(rename = "apikey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_incognito: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chat_history_length: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_role_prefix: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_result_compatible: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_for_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_search_result: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_model_monitoring: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_max_subscribe: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_model_mismatch: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_model: Option<String>,
}
