//! Remote data client for the attendance backend.
//!
//! A pure I/O boundary: one method per endpoint, no retry, no timeout. Every
//! response body is decoded into a typed payload here; a shape mismatch is an
//! `ApiError::Payload`, never a silently blank section downstream.

use std::path::Path;

use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::models::{
    DepartmentAnalyticsPayload, DepartmentTsaPayload, LoginResponse, RecognitionResponse,
    RegisterPayload, RosterEntry, StudentInfoPayload, SubmissionPayload, TeacherAnalyticsPayload,
    TeacherInfo, TeacherSchedulePayload,
};
use crate::session::Role;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const BODY_SNIPPET_LEN: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("malformed response from {endpoint}: {source}")]
    Payload {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not read image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.http.get(self.url(path)).send()?;
        decode(path, resp)
    }

    /// POST `/api/{role}/login/`. The backend reads the acting user's id out
    /// of the `email` field. Rejections come back as 4xx with a JSON body
    /// carrying the reason, so a body that parses is returned as-is and the
    /// caller inspects `status`.
    pub fn login(&self, role: Role, user_id: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let path = format!("/api/{}/login/", role.as_str());
        let resp = self
            .http
            .post(self.url(&path))
            .json(&json!({ "email": user_id, "password": password }))
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        match serde_json::from_str::<LoginResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(ApiError::Payload {
                endpoint: path,
                source: e,
            }),
            Err(_) => Err(status_error(&path, status.as_u16(), &body)),
        }
    }

    pub fn student_info(&self, student_id: &str) -> Result<StudentInfoPayload, ApiError> {
        self.get_json(&format!("/api/student-info/{}/", student_id))
    }

    pub fn teacher_info(&self, teacher_id: &str) -> Result<TeacherInfo, ApiError> {
        self.get_json(&format!("/api/teacher-info/{}/", teacher_id))
    }

    pub fn teacher_analytics(&self, teacher_id: &str) -> Result<TeacherAnalyticsPayload, ApiError> {
        self.get_json(&format!("/api/teacher-analytics/{}/", teacher_id))
    }

    pub fn teacher_schedule(&self, teacher_id: &str) -> Result<TeacherSchedulePayload, ApiError> {
        self.get_json(&format!("/api/teacher-schedule/{}/", teacher_id))
    }

    pub fn attendance_register(
        &self,
        teacher_id: &str,
        tsa_id: i64,
    ) -> Result<RegisterPayload, ApiError> {
        self.get_json(&format!("/api/teacher-attendance/{}/{}/", teacher_id, tsa_id))
    }

    pub fn tsa_students(&self, tsa_id: i64) -> Result<Vec<RosterEntry>, ApiError> {
        self.get_json(&format!("/api/tsa-students/{}/", tsa_id))
    }

    pub fn hod_info(&self, teacher_id: &str) -> Result<TeacherInfo, ApiError> {
        self.get_json(&format!("/api/hod-info/{}/", teacher_id))
    }

    pub fn department_analytics(
        &self,
        teacher_id: &str,
    ) -> Result<DepartmentAnalyticsPayload, ApiError> {
        self.get_json(&format!("/api/department-analytics/{}/", teacher_id))
    }

    pub fn department_tsa_analytics(
        &self,
        teacher_id: &str,
    ) -> Result<DepartmentTsaPayload, ApiError> {
        self.get_json(&format!("/api/department-tsa-analytics/{}/", teacher_id))
    }

    /// Upload one classroom photo for recognition. Multipart: the image file
    /// plus the subject-offering id.
    pub fn recognize_group_photo(
        &self,
        image: &Path,
        tsa_id: i64,
    ) -> Result<RecognitionResponse, ApiError> {
        let path = "/api/group-photo/";
        let form = multipart::Form::new()
            .text("tsa_id", tsa_id.to_string())
            .file("image", image)
            .map_err(|e| ApiError::Image {
                path: image.display().to_string(),
                source: e,
            })?;
        let resp = self.http.post(self.url(path)).multipart(form).send()?;
        decode(path, resp)
    }

    /// Submit the finished present/absent partition. All-or-nothing per call;
    /// any non-success status is terminal for this attempt.
    pub fn mark_attendance(&self, payload: &SubmissionPayload) -> Result<(), ApiError> {
        let path = "/api/mark-attendance/";
        let resp = self.http.post(self.url(path)).json(payload).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(status_error(path, status.as_u16(), &body));
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        log::warn!("{} returned status {}", endpoint, status.as_u16());
        return Err(status_error(endpoint, status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Payload {
        endpoint: endpoint.to_string(),
        source: e,
    })
}

fn status_error(endpoint: &str, status: u16, body: &str) -> ApiError {
    let snippet: String = body.trim().chars().take(BODY_SNIPPET_LEN).collect();
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status,
        body: snippet,
    }
}
