//! Analytics derivation layer.
//!
//! Pure, independently callable derivations over immutable record sets.
//! Everything is re-derived from the latest fetched payload on every filter
//! change; nothing here holds state.

use serde::{Deserialize, Serialize};

use crate::models::{EnrolledSubject, SubjectAttendance, TsaRecord};

/// Optional constraints; a missing dimension imposes no filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsaFilter {
    pub semester: Option<i64>,
    pub teacher_id: Option<String>,
    pub class_id: Option<String>,
}

impl TsaFilter {
    fn matches(&self, record: &TsaRecord) -> bool {
        if let Some(sem) = self.semester {
            if record.semester != sem {
                return false;
            }
        }
        if let Some(tid) = &self.teacher_id {
            if record.teacher_id != *tid {
                return false;
            }
        }
        if let Some(cid) = &self.class_id {
            if record.class_id.as_deref() != Some(cid.as_str()) {
                return false;
            }
        }
        true
    }
}

pub fn filter_by(records: &[TsaRecord], filter: &TsaFilter) -> Vec<TsaRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherOption {
    pub teacher_id: String,
    pub teacher_name: String,
}

/// Distinct filter options, computed once per fetch from the unfiltered set,
/// in first-seen order. They do not change under filtering.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub semesters: Vec<i64>,
    pub teachers: Vec<TeacherOption>,
    pub classes: Vec<String>,
}

pub fn filter_options(records: &[TsaRecord]) -> FilterOptions {
    let mut options = FilterOptions::default();
    for r in records {
        if !options.semesters.contains(&r.semester) {
            options.semesters.push(r.semester);
        }
        if !options.teachers.iter().any(|t| t.teacher_id == r.teacher_id) {
            options.teachers.push(TeacherOption {
                teacher_id: r.teacher_id.clone(),
                teacher_name: r.teacher_name.clone(),
            });
        }
        if let Some(cid) = &r.class_id {
            if !options.classes.contains(cid) {
                options.classes.push(cid.clone());
            }
        }
    }
    options
}

pub const BUCKET_LABELS: [&str; 5] = [
    "High Attendance (90-100%)",
    "Good Attendance (80-89%)",
    "Average Attendance (70-79%)",
    "Below Average (60-69%)",
    "Poor Attendance (<60%)",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: &'static str,
    pub count: usize,
}

/// Fixed-band distribution over `attendance_percentage`: `[90,100]`,
/// `[80,90)`, `[70,80)`, `[60,70)`, `[0,60)`. Every record lands in exactly
/// one bucket, so the counts always sum to the record count.
pub fn distribution_buckets(records: &[TsaRecord]) -> Vec<Bucket> {
    let mut counts = [0usize; 5];
    for r in records {
        let p = r.attendance_percentage;
        let band = if p >= 90.0 {
            0
        } else if p >= 80.0 {
            1
        } else if p >= 70.0 {
            2
        } else if p >= 60.0 {
            3
        } else {
            4
        };
        counts[band] += 1;
    }
    BUCKET_LABELS
        .into_iter()
        .zip(counts)
        .map(|(label, count)| Bucket { label, count })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterAverage {
    pub semester: i64,
    pub attendance: f64,
}

/// Unweighted arithmetic mean of `attendance_percentage` per semester, in
/// ascending semester order. NOT weighted by `total_students`; a large class
/// moves the mean no more than a small one.
pub fn semester_averages(records: &[TsaRecord]) -> Vec<SemesterAverage> {
    let mut sums: Vec<(i64, f64, usize)> = Vec::new();
    for r in records {
        match sums.iter_mut().find(|(sem, _, _)| *sem == r.semester) {
            Some((_, sum, count)) => {
                *sum += r.attendance_percentage;
                *count += 1;
            }
            None => sums.push((r.semester, r.attendance_percentage, 1)),
        }
    }
    sums.sort_by_key(|(sem, _, _)| *sem);
    sums.into_iter()
        .map(|(semester, sum, count)| SemesterAverage {
            semester,
            attendance: sum / count as f64,
        })
        .collect()
}

/// Per-subject bar chart rows: `SUBJ (class)` label and the record's
/// attendance percentage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectBar {
    pub name: String,
    pub attendance: f64,
}

pub fn subject_bars(records: &[TsaRecord]) -> Vec<SubjectBar> {
    records
        .iter()
        .map(|r| SubjectBar {
            name: format!(
                "{} ({})",
                r.subject_code,
                r.class_id.as_deref().unwrap_or("N/A")
            ),
            attendance: r.attendance_percentage,
        })
        .collect()
}

/// Overall attendance across a student's subjects:
/// `sum(attended) / sum(total) * 100`, defined as 0 on a zero denominator.
pub fn overall_attendance(subjects: &[SubjectAttendance]) -> f64 {
    let total: u32 = subjects.iter().map(|s| s.total_classes).sum();
    let attended: u32 = subjects.iter().map(|s| s.classes_attended).sum();
    if total == 0 {
        0.0
    } else {
        attended as f64 / total as f64 * 100.0
    }
}

/// Chart rows for the student dashboard: subjects that have met at least
/// once, with the student's own percentage next to the class average.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectChartRow {
    pub name: String,
    pub individual: f64,
    pub class_average: f64,
}

pub fn subject_chart_rows(subjects: &[EnrolledSubject]) -> Vec<SubjectChartRow> {
    subjects
        .iter()
        .filter(|s| s.attendance.total_classes > 0)
        .map(|s| SubjectChartRow {
            name: s.subject_code.clone(),
            individual: s.attendance.attendance_percentage,
            class_average: s.attendance.class_average_attendance_percentage,
        })
        .collect()
}
