use serde_json::json;

use crate::api::ApiError;
use crate::ipc::error::err;
use crate::ipc::types::AppState;
use crate::session::SessionContext;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<ApiError> for HandlerErr {
    fn from(e: ApiError) -> Self {
        match &e {
            ApiError::Transport(_) => HandlerErr::new("network_failed", e.to_string()),
            ApiError::Status { status, .. } => HandlerErr {
                code: "api_status",
                message: e.to_string(),
                details: Some(json!({ "status": status })),
            },
            ApiError::Payload { .. } => HandlerErr::new("bad_payload", e.to_string()),
            ApiError::Image { .. } => HandlerErr::new("image_unreadable", e.to_string()),
        }
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

pub fn get_required_i64(params: &serde_json::Value, key: &str) -> Result<i64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

/// Optional string param; absent, null, or empty all mean "not given" (the
/// shell sends an empty string for a cleared filter select).
pub fn get_opt_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn get_opt_i64(params: &serde_json::Value, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.as_i64())
}

pub fn require_session(state: &AppState) -> Result<&SessionContext, HandlerErr> {
    state
        .session
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_session", "no session; log in first"))
}
