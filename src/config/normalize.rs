//! Input normalization for credentials and configuration records.
//!
//! Pure functions: raw admin or file input goes in, canonical values come
//! out. Nothing here touches shared state or fails.

use crate::config::schema::{ConfigInput, ConfigRecord};

/// Split raw session input into clean tokens.
///
/// Entries may be blobs separated by commas, newlines, carriage returns, or
/// tabs. Each token is trimmed; a token carrying `:`-suffixed metadata is
/// truncated to the part before the first `:`. Empty tokens are dropped.
/// Order of first appearance is preserved and duplicates are kept.
pub fn normalize_sessions(raw: &[String]) -> Vec<String> {
    let mut keys = Vec::new();
    for blob in raw {
        for part in blob.split([',', '\n', '\r', '\t']) {
            let value = part.trim();
            if value.is_empty() {
                continue;
            }
            let value = match value.split_once(':') {
                Some((key, _)) => key.trim(),
                None => value,
            };
            if !value.is_empty() {
                keys.push(value.to_string());
            }
        }
    }
    keys
}

/// Overlay a partial input onto the default record.
///
/// String fields are trimmed and only applied when non-empty, except
/// `apikey`, `proxy`, and `force_model`, which are applied whenever present
/// (an explicit empty value clears them). The history limit is only applied
/// when positive. Absent fields keep their defaults.
pub fn normalize_record(input: ConfigInput) -> ConfigRecord {
    let mut record = ConfigRecord::default();

    if let Some(address) = trimmed_non_empty(input.address) {
        record.address = address;
    }
    if let Some(api_key) = input.api_key {
        record.api_key = api_key.trim().to_string();
    }
    if let Some(proxy) = input.proxy {
        record.proxy = proxy.trim().to_string();
    }
    if let Some(is_incognito) = input.is_incognito {
        record.is_incognito = is_incognito;
    }
    if let Some(limit) = input.max_chat_history_length {
        if limit > 0 {
            record.max_chat_history_length = limit as usize;
        }
    }
    if let Some(no_role_prefix) = input.no_role_prefix {
        record.no_role_prefix = no_role_prefix;
    }
    if let Some(compatible) = input.search_result_compatible {
        record.search_result_compatible = compatible;
    }
    if let Some(prompt) = trimmed_non_empty(input.prompt_for_file) {
        record.prompt_for_file = prompt;
    }
    if let Some(ignore) = input.ignore_search_result {
        record.ignore_search_result = ignore;
    }
    if let Some(ignore) = input.ignore_model_monitoring {
        record.ignore_model_monitoring = ignore;
    }
    if let Some(is_max) = input.is_max_subscribe {
        record.is_max_subscribe = is_max;
    }
    if let Some(reject) = input.reject_model_mismatch {
        record.reject_model_mismatch = reject;
    }
    if let Some(model) = trimmed_non_empty(input.default_model) {
        record.default_model = model;
    }
    if let Some(force_model) = input.force_model {
        record.force_model = force_model.trim().to_string();
    }
    if let Some(raw) = input.sessions {
        record.sessions = normalize_sessions(&raw);
    }

    record
}

fn trimmed_non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_normalize_sessions_splits_trims_and_truncates() {
        let keys = normalize_sessions(&raw(&["a:secret1", " b ", "", "c,d"]));
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_normalize_sessions_splits_on_all_separators() {
        let keys = normalize_sessions(&raw(&["one\ntwo\rthree\tfour,five"]));
        assert_eq!(keys, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_normalize_sessions_drops_empty_truncations() {
        let keys = normalize_sessions(&raw(&[":orphan", "  ", "\n\r\t"]));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_normalize_sessions_trims_after_truncation() {
        let keys = normalize_sessions(&raw(&["ab :secret"]));
        assert_eq!(keys, vec!["ab"]);
    }

    #[test]
    fn test_normalize_sessions_keeps_duplicates_in_order() {
        let keys = normalize_sessions(&raw(&["tok,tok", "tok2"]));
        assert_eq!(keys, vec!["tok", "tok", "tok2"]);
    }

    #[test]
    fn test_normalize_sessions_truncates_at_first_colon_only() {
        let keys = normalize_sessions(&raw(&["key:meta:extra"]));
        assert_eq!(keys, vec!["key"]);
    }

    #[test]
    fn test_normalize_sessions_is_idempotent() {
        let once = normalize_sessions(&raw(&["a:x", " b ", "c,d", "dup,dup"]));
        let twice = normalize_sessions(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_record_empty_input_is_default() {
        let record = normalize_record(ConfigInput::default());
        assert_eq!(record, ConfigRecord::default());
    }

    #[test]
    fn test_normalize_record_overlays_present_fields() {
        let input = ConfigInput {
            sessions: Some(raw(&["s1,s2"])),
            address: Some(" 127.0.0.1:9000 ".to_string()),
            api_key: Some("secret".to_string()),
            is_incognito: Some(false),
            max_chat_history_length: Some(250),
            default_model: Some(" claude-4 ".to_string()),
            ..ConfigInput::default()
        };
        let record = normalize_record(input);
        assert_eq!(record.sessions, vec!["s1", "s2"]);
        assert_eq!(record.address, "127.0.0.1:9000");
        assert_eq!(record.api_key, "secret");
        assert!(!record.is_incognito);
        assert_eq!(record.max_chat_history_length, 250);
        assert_eq!(record.default_model, "claude-4");
    }

    #[test]
    fn test_normalize_record_empty_strings_keep_defaults() {
        let input = ConfigInput {
            address: Some("   ".to_string()),
            default_model: Some("".to_string()),
            prompt_for_file: Some(" ".to_string()),
            ..ConfigInput::default()
        };
        let record = normalize_record(input);
        let defaults = ConfigRecord::default();
        assert_eq!(record.address, defaults.address);
        assert_eq!(record.default_model, defaults.default_model);
        assert_eq!(record.prompt_for_file, defaults.prompt_for_file);
    }

    #[test]
    fn test_normalize_record_present_apikey_clears() {
        let input = ConfigInput {
            api_key: Some("   ".to_string()),
            ..ConfigInput::default()
        };
        assert_eq!(normalize_record(input).api_key, "");
    }

    #[test]
    fn test_normalize_record_ignores_non_positive_history_limit() {
        for limit in [0, -5] {
            let input = ConfigInput {
                max_chat_history_length: Some(limit),
                ..ConfigInput::default()
            };
            assert_eq!(normalize_record(input).max_chat_history_length, 10_000);
        }
    }

    #[test]
    fn test_normalize_record_force_model_can_be_cleared() {
        let input = ConfigInput {
            force_model: Some("  ".to_string()),
            ..ConfigInput::default()
        };
        assert_eq!(normalize_record(input).force_model, "");
    }
}
