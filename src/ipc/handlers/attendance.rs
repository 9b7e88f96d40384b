use std::path::PathBuf;

use chrono::Local;
use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_opt_str, get_required_i64, get_required_str, require_session, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::marking::{self, ImageRejection, MarkingSession, SessionMeta, MAX_IMAGES};
use crate::models::DetectedStudent;
use crate::reconcile;

impl From<ImageRejection> for HandlerErr {
    fn from(r: ImageRejection) -> Self {
        match r {
            ImageRejection::TooMany { selected, attempted } => HandlerErr {
                code: "too_many_images",
                message: format!("You can only upload a maximum of {} images", MAX_IMAGES),
                details: Some(json!({ "selected": selected, "attempted": attempted })),
            },
            ImageRejection::Missing { path } => HandlerErr {
                code: "image_not_found",
                message: format!("no such file: {}", path),
                details: None,
            },
            ImageRejection::BadIndex { index } => HandlerErr {
                code: "bad_params",
                message: format!("no image at index {}", index),
                details: None,
            },
        }
    }
}

fn require_marking<'a>(state: &'a mut AppState) -> Result<&'a mut MarkingSession, HandlerErr> {
    state
        .marking
        .as_mut()
        .ok_or_else(|| HandlerErr::new("no_marking_session", "no marking session started"))
}

fn session_view(s: &MarkingSession) -> serde_json::Value {
    json!({
        "meta": &s.meta,
        "roster": &s.roster,
        "images": s.images.iter().map(|p| p.to_string_lossy().to_string()).collect::<Vec<_>>(),
        "present": &s.present,
        "absent": &s.absent,
    })
}

fn start(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_session(state)?;
    let tsa_id = get_required_i64(params, "tsaId")?;
    let class_id = get_required_str(params, "classId")?;

    let now = Local::now();
    let date = get_opt_str(params, "date").unwrap_or_else(|| now.format("%Y-%m-%d").to_string());
    let day = get_opt_str(params, "day")
        .map(|d| d.to_ascii_uppercase())
        .unwrap_or_else(|| now.format("%A").to_string().to_ascii_uppercase());

    // A scheduled session id, or a generated one for an extra class.
    let session_id = match get_opt_str(params, "sessionId") {
        Some(sid) => sid,
        None => match get_opt_str(params, "extraSlot") {
            Some(slot) => marking::extra_session_id(&day, &slot),
            None => {
                return Err(HandlerErr::new(
                    "bad_params",
                    "either sessionId or extraSlot is required",
                ))
            }
        },
    };

    let roster = state.api.tsa_students(tsa_id)?;
    let meta = SessionMeta {
        tsa_id,
        class_id,
        date,
        day,
        session_id,
    };
    let session = MarkingSession::new(meta, roster);
    let view = session_view(&session);
    state.marking = Some(session);
    Ok(view)
}

fn images_add(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let marking = require_marking(state)?;
    let paths: Vec<PathBuf> = params
        .get("paths")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(PathBuf::from)
                .collect()
        })
        .ok_or_else(|| HandlerErr::new("bad_params", "missing paths"))?;

    marking.add_images(paths)?;
    Ok(json!({
        "images": marking.images.iter().map(|p| p.to_string_lossy().to_string()).collect::<Vec<_>>(),
        "count": marking.images.len(),
    }))
}

fn images_remove(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let marking = require_marking(state)?;
    let index = get_required_i64(params, "index")?;
    if index < 0 {
        return Err(HandlerErr::new("bad_params", "index must be non-negative"));
    }
    marking.remove_image(index as usize)?;
    Ok(json!({
        "images": marking.images.iter().map(|p| p.to_string_lossy().to_string()).collect::<Vec<_>>(),
        "count": marking.images.len(),
    }))
}

/// One image in flight at a time, in submission order, fail-fast. An error on
/// image N aborts images N+1.. and leaves the current partition untouched.
fn images_process(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let marking = state
        .marking
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_marking_session", "no marking session started"))?;
    if marking.images.is_empty() {
        return Err(HandlerErr::new("no_images", "Please upload at least 1 image"));
    }

    let images = marking.images.clone();
    let tsa_id = marking.meta.tsa_id;
    let total = images.len();
    let mut per_image: Vec<Vec<DetectedStudent>> = Vec::with_capacity(total);

    for (i, image) in images.iter().enumerate() {
        log::info!("processing image {}/{}", i + 1, total);
        let resp = state
            .api
            .recognize_group_photo(image, tsa_id)
            .map_err(|e| {
                let mut mapped = HandlerErr::from(e);
                mapped.details = Some(json!({ "imageIndex": i, "processed": i }));
                mapped
            })?;
        per_image.push(resp.identified_students);
    }

    let marking = require_marking(state)?;
    let result = reconcile::reconcile(&marking.roster, &per_image);
    marking.apply(result);

    Ok(json!({
        "processedImages": total,
        "identified": marking.present.len(),
        "present": &marking.present,
        "absent": &marking.absent,
    }))
}

fn toggle(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let marking = require_marking(state)?;
    let Some(side) = marking.toggle(&student_id) else {
        return Err(HandlerErr::new(
            "not_found",
            format!("student {} is on neither side", student_id),
        ));
    };
    Ok(json!({
        "movedTo": side,
        "present": &marking.present,
        "absent": &marking.absent,
    }))
}

fn status(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let marking = require_marking(state)?;
    Ok(session_view(marking))
}

fn submit(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let marking = state
        .marking
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_marking_session", "no marking session started"))?;

    let payload = marking.build_submission();
    let records = payload.attendance_data.len();
    // All-or-nothing: a failed call leaves the marking session intact so the
    // user can adjust and submit again.
    state.api.mark_attendance(&payload)?;
    log::info!(
        "submitted attendance for {} students (session {})",
        records,
        payload.session_id
    );
    state.marking = None;
    Ok(json!({ "submitted": true, "records": records }))
}

fn cancel(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let had_session = state.marking.take().is_some();
    Ok(json!({ "cancelled": had_session }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.start" => start(state, &req.params),
        "attendance.images.add" => images_add(state, &req.params),
        "attendance.images.remove" => images_remove(state, &req.params),
        "attendance.images.process" => images_process(state),
        "attendance.toggle" => toggle(state, &req.params),
        "attendance.status" => status(state),
        "attendance.submit" => submit(state),
        "attendance.cancel" => cancel(state),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    })
}
