use serde_json::json;

use crate::analytics;
use crate::ipc::error::ok;
use crate::ipc::helpers::{require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::models::SubjectAttendance;

fn dashboard_open(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let payload = state.api.student_info(&session.user_id)?;

    let attendance: Vec<SubjectAttendance> = payload
        .enrolled_subjects
        .iter()
        .map(|s| s.attendance.clone())
        .collect();
    let overall = analytics::overall_attendance(&attendance);
    let chart_rows = analytics::subject_chart_rows(&payload.enrolled_subjects);

    Ok(json!({
        "studentInfo": payload.student_info,
        "enrolledSubjects": payload.enrolled_subjects,
        "overallAttendance": overall,
        "chartRows": chart_rows,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "student.dashboard.open" => Some(match dashboard_open(state) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
