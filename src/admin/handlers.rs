use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::config::{ConfigError, ConfigInput};
use crate::http::server::AppState;

/// Admin view of the configuration, API key redacted.
#[derive(Debug, Serialize)]
pub struct AdminConfigResponse {
    pub address: String,
    pub api_key_set: bool,
    pub api_key_hint: String,
    pub proxy: String,
    pub is_incognito: bool,
    pub max_chat_history_length: usize,
    pub retry_count: usize,
    pub no_role_prefix: bool,
    pub search_result_compatible: bool,
    pub prompt_for_file: String,
    pub ignore_search_result: bool,
    pub ignore_model_monitoring: bool,
    pub is_max_subscribe: bool,
    pub reject_model_mismatch: bool,
    pub default_model: String,
    pub force_model: String,
    pub sessions: Vec<String>,
    pub sessions_count: usize,
}

pub async fn get_config(State(state): State<AppState>) -> Json<AdminConfigResponse> {
    let snapshot = state.manager.store().snapshot();
    let sessions_count = snapshot.sessions.len();

    Json(AdminConfigResponse {
        address: snapshot.address,
        api_key_set: !snapshot.api_key.is_empty(),
        api_key_hint: mask_api_key(&snapshot.api_key),
        proxy: snapshot.proxy,
        is_incognito: snapshot.is_incognito,
        max_chat_history_length: snapshot.max_chat_history_length,
        retry_count: sessions_count,
        no_role_prefix: snapshot.no_role_prefix,
        search_result_compatible: snapshot.search_result_compatible,
        prompt_for_file: snapshot.prompt_for_file,
        ignore_search_result: snapshot.ignore_search_result,
        ignore_model_monitoring: snapshot.ignore_model_monitoring,
        is_max_subscribe: snapshot.is_max_subscribe,
        reject_model_mismatch: snapshot.reject_model_mismatch,
        default_model: snapshot.default_model,
        force_model: snapshot.force_model,
        sessions: snapshot.sessions,
        sessions_count,
    })
}

pub async fn update_config(
    State(state): State<AppState>,
    payload: Result<Json<ConfigInput>, JsonRejection>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Ok(Json(input)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Invalid request body" })),
        );
    };

    match state.manager.update(&input) {
        Ok(outcome) if outcome.persisted => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "changed": outcome.changed,
                "persisted": true,
            })),
        ),
        Ok(outcome) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "status": "error",
                "error": "Failed to persist config",
                "changed": outcome.changed,
                "persisted": false,
            })),
        ),
        Err(ConfigError::Validation(err)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": err.to_string() })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": err.to_string() })),
        ),
    }
}

/// Redact an API key to its last four characters.
pub fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
