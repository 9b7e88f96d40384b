//! The attendance marking session: session metadata, the selected image
//! queue, the present/absent partition, manual overrides, and the submission
//! assembler. One marking session exists at a time; starting a new one
//! replaces it.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::{AttendanceMark, RosterEntry, SubmissionPayload};
use crate::reconcile::{IdentificationRecord, Reconciliation};

pub const MAX_IMAGES: usize = 5;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    pub tsa_id: i64,
    pub class_id: String,
    pub date: String,
    pub day: String,
    pub session_id: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ImageRejection {
    /// Adding the batch would exceed the cap. Rejected atomically, before
    /// any file is queued.
    TooMany { selected: usize, attempted: usize },
    Missing { path: String },
    BadIndex { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Present,
    Absent,
}

pub struct MarkingSession {
    pub meta: SessionMeta,
    pub roster: Vec<RosterEntry>,
    pub images: Vec<PathBuf>,
    pub present: Vec<IdentificationRecord>,
    pub absent: Vec<RosterEntry>,
}

impl MarkingSession {
    /// Everyone starts present with no detection evidence; processing a
    /// photo batch replaces the partition wholesale.
    pub fn new(meta: SessionMeta, roster: Vec<RosterEntry>) -> Self {
        let present = roster
            .iter()
            .map(|r| IdentificationRecord {
                student_id: r.student_id.clone(),
                student_name: r.student_name.clone(),
                total_detection_count: 0,
            })
            .collect();
        Self {
            meta,
            roster,
            images: Vec::new(),
            present,
            absent: Vec::new(),
        }
    }

    pub fn add_images(&mut self, paths: Vec<PathBuf>) -> Result<(), ImageRejection> {
        let supported: Vec<PathBuf> = paths
            .into_iter()
            .filter(|p| has_supported_extension(p))
            .collect();
        if self.images.len() + supported.len() > MAX_IMAGES {
            return Err(ImageRejection::TooMany {
                selected: self.images.len(),
                attempted: supported.len(),
            });
        }
        for p in &supported {
            if !p.is_file() {
                return Err(ImageRejection::Missing {
                    path: p.display().to_string(),
                });
            }
        }
        self.images.extend(supported);
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> Result<PathBuf, ImageRejection> {
        if index >= self.images.len() {
            return Err(ImageRejection::BadIndex { index });
        }
        Ok(self.images.remove(index))
    }

    /// Replace the partition with a fresh reconciliation result. No
    /// incremental merge across cycles.
    pub fn apply(&mut self, reconciliation: Reconciliation) {
        self.present = reconciliation.present;
        self.absent = reconciliation.absent;
    }

    /// Manual override: move one student to the other side, unconditionally.
    /// A student toggled into `present` carries no detection evidence.
    pub fn toggle(&mut self, student_id: &str) -> Option<Side> {
        if let Some(pos) = self.present.iter().position(|p| p.student_id == student_id) {
            let rec = self.present.remove(pos);
            self.absent.push(RosterEntry {
                student_id: rec.student_id,
                student_name: rec.student_name,
            });
            return Some(Side::Absent);
        }
        if let Some(pos) = self.absent.iter().position(|a| a.student_id == student_id) {
            let entry = self.absent.remove(pos);
            self.present.push(IdentificationRecord {
                student_id: entry.student_id,
                student_name: entry.student_name,
                total_detection_count: 0,
            });
            return Some(Side::Present);
        }
        None
    }

    /// One boolean-status record per student, present-first, with the session
    /// metadata passed through unchanged.
    pub fn build_submission(&self) -> SubmissionPayload {
        let mut attendance_data: Vec<AttendanceMark> = self
            .present
            .iter()
            .map(|p| AttendanceMark {
                student_id: p.student_id.clone(),
                status: true,
            })
            .collect();
        attendance_data.extend(self.absent.iter().map(|a| AttendanceMark {
            student_id: a.student_id.clone(),
            status: false,
        }));
        SubmissionPayload {
            date: self.meta.date.clone(),
            day: self.meta.day.clone(),
            session_id: self.meta.session_id.clone(),
            class_id: self.meta.class_id.clone(),
            tsa_id: self.meta.tsa_id,
            attendance_data,
        }
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Session id for an extra (unscheduled) class: `X` + 3-letter day + slot,
/// e.g. `XMONP34`.
pub fn extra_session_id(day: &str, slot: &str) -> String {
    let day_short: String = day.chars().take(3).collect();
    format!("X{}{}", day_short.to_ascii_uppercase(), slot)
}
