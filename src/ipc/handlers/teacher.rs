use serde::Serialize;
use serde_json::json;

use crate::api::ApiError;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_i64, require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};

/// The dashboard issues independent fetches; each section succeeds or fails
/// on its own and updates its own piece of shell state.
pub fn section<T: Serialize>(result: Result<T, ApiError>) -> serde_json::Value {
    match result {
        Ok(data) => json!({ "ok": true, "data": data }),
        Err(e) => {
            let mapped = HandlerErr::from(e);
            json!({
                "ok": false,
                "error": { "code": mapped.code, "message": mapped.message }
            })
        }
    }
}

fn dashboard_open(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let teacher_id = session.user_id.clone();

    Ok(json!({
        "info": section(state.api.teacher_info(&teacher_id)),
        "courses": section(state.api.teacher_analytics(&teacher_id)),
        "schedule": section(state.api.teacher_schedule(&teacher_id)),
    }))
}

fn register_open(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let tsa_id = get_required_i64(params, "tsaId")?;
    let register = state.api.attendance_register(&session.user_id, tsa_id)?;
    Ok(json!({ "register": register }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "teacher.dashboard.open" => dashboard_open(state),
        "teacher.register.open" => register_open(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    })
}
