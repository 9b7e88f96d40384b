use serde_json::json;

use crate::analytics::{self, TsaFilter};
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_opt_i64, get_opt_str, require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};

use super::teacher::section;

fn dashboard_open(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let hod_id = session.user_id.clone();

    let info = section(state.api.hod_info(&hod_id));
    let department = section(state.api.department_analytics(&hod_id));

    // The TSA record set is the immutable input for every subsequent filter
    // view; cache it so views never refetch.
    let tsa = state.api.department_tsa_analytics(&hod_id);
    let tsa_section = match tsa {
        Ok(payload) => {
            state.department = Some(payload.clone());
            section(Ok::<_, crate::api::ApiError>(payload))
        }
        Err(e) => {
            state.department = None;
            section(Err::<crate::models::DepartmentTsaPayload, _>(e))
        }
    };

    Ok(json!({
        "info": info,
        "department": department,
        "tsaAnalytics": tsa_section,
    }))
}

fn analytics_view(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_session(state)?;
    let Some(payload) = &state.department else {
        return Err(HandlerErr::new(
            "no_analytics",
            "no department analytics fetched; open the dashboard first",
        ));
    };

    let filter = TsaFilter {
        semester: get_opt_i64(params, "semester"),
        teacher_id: get_opt_str(params, "teacherId"),
        class_id: get_opt_str(params, "classId"),
    };

    let rows = analytics::filter_by(&payload.tsa_analytics, &filter);
    // Options come from the unfiltered set; they do not narrow as filters
    // are applied.
    let options = analytics::filter_options(&payload.tsa_analytics);
    let distribution = analytics::distribution_buckets(&rows);
    let semester_averages = analytics::semester_averages(&rows);
    let subject_bars = analytics::subject_bars(&rows);

    Ok(json!({
        "branchId": &payload.branch_id,
        "branchName": &payload.branch_name,
        "rows": rows,
        "filterOptions": options,
        "distribution": distribution,
        "semesterAverages": semester_averages,
        "subjectAttendance": subject_bars,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "hod.dashboard.open" => dashboard_open(state),
        "hod.analytics.view" => analytics_view(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    })
}
