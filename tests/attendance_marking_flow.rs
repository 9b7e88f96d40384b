use serde_json::json;

mod support;
use support::{request_err, request_ok, spawn_sidecar, temp_dir, StubApi};

fn student_ids(list: &serde_json::Value) -> Vec<String> {
    list.as_array()
        .expect("array of students")
        .iter()
        .map(|s| {
            s.get("student_id")
                .and_then(|v| v.as_str())
                .expect("student_id")
                .to_string()
        })
        .collect()
}

#[test]
fn marking_session_start_process_toggle_submit_flow() {
    let stub = StubApi::start();
    stub.on(
        "POST",
        "/api/teacher/login/",
        200,
        json!({ "status": "success", "token": { "user_id": "T001", "role": "teacher" } }),
    );
    stub.on(
        "GET",
        "/api/tsa-students/42/",
        200,
        json!([
            { "student_id": "S1", "student_name": "Alice" },
            { "student_id": "S2", "student_name": "Bob" },
            { "student_id": "S3", "student_name": "Carol" }
        ]),
    );
    // Two photos, processed in order. S1 is seen in both, S2 only in the
    // first, S3 in neither.
    stub.on(
        "POST",
        "/api/group-photo/",
        200,
        json!({
            "total_faces_found": 3,
            "students_identified": 2,
            "identified_students": [
                { "id": "S2", "name": "Bob", "detection_count": 2 },
                { "id": "S1", "name": "Alice", "detection_count": 1 }
            ]
        }),
    );
    stub.on(
        "POST",
        "/api/group-photo/",
        200,
        json!({
            "total_faces_found": 2,
            "students_identified": 1,
            "identified_students": [
                { "id": "S1", "name": "Alice", "detection_count": 2 }
            ]
        }),
    );
    stub.on(
        "POST",
        "/api/mark-attendance/",
        200,
        json!({ "status": "success" }),
    );

    let photos = temp_dir("attendanced-marking-photos");
    let photo_a = photos.join("a.jpg");
    let photo_b = photos.join("b.jpg");
    let notes = photos.join("notes.txt");
    std::fs::write(&photo_a, b"jpg-a").expect("write photo a");
    std::fs::write(&photo_b, b"jpg-b").expect("write photo b");
    std::fs::write(&notes, b"not a photo").expect("write notes");

    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.url());
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "teacher", "userId": "T001", "password": "pw" }),
    );

    let started = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.start",
        json!({
            "tsaId": 42,
            "classId": "CSE-A",
            "date": "2026-03-02",
            "day": "Monday",
            "sessionId": "MONP12"
        }),
    );
    let meta = started.get("meta").expect("session meta");
    assert_eq!(meta.get("day").and_then(|v| v.as_str()), Some("MONDAY"));
    assert_eq!(meta.get("sessionId").and_then(|v| v.as_str()), Some("MONP12"));
    // Everyone starts present, nobody absent, no photos yet.
    assert_eq!(
        student_ids(started.get("present").expect("present")),
        vec!["S1", "S2", "S3"]
    );
    assert!(started
        .get("absent")
        .and_then(|v| v.as_array())
        .map(|a| a.is_empty())
        .unwrap_or(false));

    // The text file is silently dropped; only supported photo types queue.
    let added = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.images.add",
        json!({ "paths": [photo_a.to_string_lossy(), notes.to_string_lossy(), photo_b.to_string_lossy()] }),
    );
    assert_eq!(added.get("count").and_then(|v| v.as_u64()), Some(2));

    // Cap check happens before anything queues, so the batch is rejected
    // whole and the queue keeps its two photos.
    let error = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "attendance.images.add",
        json!({ "paths": ["x1.jpg", "x2.jpg", "x3.jpg", "x4.jpg"] }),
        "too_many_images",
    );
    assert_eq!(
        error.get("message").and_then(|v| v.as_str()),
        Some("You can only upload a maximum of 5 images")
    );
    let status = request_ok(&mut stdin, &mut reader, "5", "attendance.status", json!({}));
    assert_eq!(
        status
            .get("images")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(2)
    );

    let processed = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "attendance.images.process",
        json!({}),
    );
    assert_eq!(
        processed.get("processedImages").and_then(|v| v.as_u64()),
        Some(2)
    );
    // S1: 1 + 2 detections, S2: 2, so S1 ranks first. S3 was never seen.
    assert_eq!(
        student_ids(processed.get("present").expect("present")),
        vec!["S1", "S2"]
    );
    let present = processed
        .get("present")
        .and_then(|v| v.as_array())
        .expect("present array");
    assert_eq!(
        present[0]
            .get("total_detection_count")
            .and_then(|v| v.as_u64()),
        Some(3)
    );
    assert_eq!(
        present[1]
            .get("total_detection_count")
            .and_then(|v| v.as_u64()),
        Some(2)
    );
    assert_eq!(
        student_ids(processed.get("absent").expect("absent")),
        vec!["S3"]
    );
    assert_eq!(stub.hits("/api/group-photo/"), 2);

    // Manual overrides: bring S3 back in, send S2 out.
    let toggled = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "attendance.toggle",
        json!({ "studentId": "S3" }),
    );
    assert_eq!(
        toggled.get("movedTo").and_then(|v| v.as_str()),
        Some("present")
    );
    let toggled = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "attendance.toggle",
        json!({ "studentId": "S2" }),
    );
    assert_eq!(
        toggled.get("movedTo").and_then(|v| v.as_str()),
        Some("absent")
    );
    assert_eq!(
        student_ids(toggled.get("present").expect("present")),
        vec!["S1", "S3"]
    );

    let _ = request_err(
        &mut stdin,
        &mut reader,
        "9",
        "attendance.toggle",
        json!({ "studentId": "S9" }),
        "not_found",
    );

    let submitted = request_ok(&mut stdin, &mut reader, "10", "attendance.submit", json!({}));
    assert_eq!(
        submitted.get("submitted").and_then(|v| v.as_bool()),
        Some(true)
    );
    assert_eq!(submitted.get("records").and_then(|v| v.as_u64()), Some(3));

    // The wire payload carries the session metadata verbatim and one record
    // per student, present students first.
    let body = stub.last_json_body("/api/mark-attendance/");
    assert_eq!(body.get("Date").and_then(|v| v.as_str()), Some("2026-03-02"));
    assert_eq!(body.get("Day").and_then(|v| v.as_str()), Some("MONDAY"));
    assert_eq!(
        body.get("Session_ID").and_then(|v| v.as_str()),
        Some("MONP12")
    );
    assert_eq!(body.get("Class_ID").and_then(|v| v.as_str()), Some("CSE-A"));
    assert_eq!(body.get("TSA_ID").and_then(|v| v.as_i64()), Some(42));
    let marks: Vec<(String, bool)> = body
        .get("attendance_data")
        .and_then(|v| v.as_array())
        .expect("attendance_data")
        .iter()
        .map(|m| {
            (
                m.get("student_id").and_then(|v| v.as_str()).unwrap().to_string(),
                m.get("status").and_then(|v| v.as_bool()).unwrap(),
            )
        })
        .collect();
    assert_eq!(
        marks,
        vec![
            ("S1".to_string(), true),
            ("S3".to_string(), true),
            ("S2".to_string(), false)
        ]
    );

    // A successful submit closes the marking session.
    let _ = request_err(
        &mut stdin,
        &mut reader,
        "11",
        "attendance.status",
        json!({}),
        "no_marking_session",
    );
}

#[test]
fn extra_class_generates_its_own_session_id() {
    let stub = StubApi::start();
    stub.on(
        "POST",
        "/api/teacher/login/",
        200,
        json!({ "status": "success", "token": { "user_id": "T001", "role": "teacher" } }),
    );
    stub.on("GET", "/api/tsa-students/7/", 200, json!([]));

    let (_child, mut stdin, mut reader) = spawn_sidecar(&stub.url());
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "teacher", "userId": "T001", "password": "pw" }),
    );

    let started = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.start",
        json!({ "tsaId": 7, "classId": "CSE-B", "day": "friday", "extraSlot": "P34" }),
    );
    assert_eq!(
        started
            .get("meta")
            .and_then(|m| m.get("sessionId"))
            .and_then(|v| v.as_str()),
        Some("XFRIP34")
    );

    // Neither a scheduled session id nor an extra slot: nothing to mark
    // against.
    let _ = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.start",
        json!({ "tsaId": 7, "classId": "CSE-B" }),
        "bad_params",
    );

    let cancelled = request_ok(&mut stdin, &mut reader, "4", "attendance.cancel", json!({}));
    assert_eq!(
        cancelled.get("cancelled").and_then(|v| v.as_bool()),
        Some(true)
    );
}
