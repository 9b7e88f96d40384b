//! Typed payload shapes for every remote boundary.
//!
//! Field renames mirror the backend wire format exactly (`Student_ID`,
//! `Total_Classes`, ...), so parsed payloads can be handed back to the shell
//! unchanged. Parsing happens once, in `api`; nothing past that boundary sees
//! untyped JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---- login ----

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<LoginToken>,
}

/// The opaque identity token the backend issues on login. The backend reads
/// the user id out of the `email` field of the request; the token it returns
/// is all the client ever holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginToken {
    pub user_id: String,
    pub role: String,
}

// ---- roster / recognition ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub student_id: String,
    pub student_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionResponse {
    #[serde(default)]
    pub total_faces_found: u32,
    #[serde(default)]
    pub students_identified: u32,
    #[serde(default)]
    pub identified_students: Vec<DetectedStudent>,
}

/// One distinct student detected in one uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedStudent {
    pub id: String,
    pub name: String,
    pub detection_count: u32,
}

// ---- attendance submission ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Session_ID")]
    pub session_id: String,
    #[serde(rename = "Class_ID")]
    pub class_id: String,
    #[serde(rename = "TSA_ID")]
    pub tsa_id: i64,
    pub attendance_data: Vec<AttendanceMark>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub student_id: String,
    pub status: bool,
}

// ---- student dashboard ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfoPayload {
    #[serde(rename = "Student_Info")]
    pub student_info: StudentInfo,
    #[serde(rename = "Enrolled_Subjects")]
    pub enrolled_subjects: Vec<EnrolledSubject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    #[serde(rename = "Student_ID")]
    pub student_id: String,
    #[serde(rename = "Student_Name")]
    pub student_name: String,
    #[serde(rename = "Branch_ID")]
    pub branch_id: String,
    #[serde(rename = "Branch_Name")]
    pub branch_name: String,
    #[serde(rename = "Graduation_Batch")]
    pub graduation_batch: i64,
    #[serde(rename = "Student_Email")]
    pub student_email: String,
    #[serde(rename = "Parents_Contact")]
    pub parents_contact: Option<String>,
    #[serde(rename = "Image_URL")]
    pub image_url: Option<String>,
    #[serde(rename = "Current_Class")]
    pub current_class: CurrentClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentClass {
    #[serde(rename = "Semester")]
    pub semester: i64,
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Class_ID")]
    pub class_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledSubject {
    #[serde(rename = "Subject_Code")]
    pub subject_code: String,
    #[serde(rename = "Subject_Name")]
    pub subject_name: String,
    #[serde(rename = "Teacher_Name")]
    pub teacher_name: String,
    #[serde(rename = "TSA_ID")]
    pub tsa_id: i64,
    #[serde(rename = "Attendance")]
    pub attendance: SubjectAttendance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectAttendance {
    #[serde(rename = "Total_Classes")]
    pub total_classes: u32,
    #[serde(rename = "Classes_Attended")]
    pub classes_attended: u32,
    #[serde(rename = "Attendance_Percentage")]
    pub attendance_percentage: f64,
    #[serde(rename = "Class_Average_Attendance_Percentage")]
    pub class_average_attendance_percentage: f64,
}

// ---- teacher dashboard ----

/// Shared by the teacher and HOD info endpoints; both return a teacher row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherInfo {
    #[serde(rename = "Teacher_ID")]
    pub teacher_id: String,
    #[serde(rename = "Teacher_Name")]
    pub teacher_name: String,
    #[serde(rename = "Initials")]
    pub initials: String,
    #[serde(rename = "Branch_ID")]
    pub branch_id: String,
    #[serde(rename = "Branch_Name")]
    pub branch_name: String,
    #[serde(rename = "Teacher_Email")]
    pub teacher_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAnalyticsPayload {
    pub teacher_id: String,
    pub analytics: Vec<CourseAnalytics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAnalytics {
    #[serde(rename = "TSA_ID")]
    pub tsa_id: i64,
    #[serde(rename = "Subject_Code")]
    pub subject_code: String,
    #[serde(rename = "Subject_Name")]
    pub subject_name: String,
    #[serde(rename = "Is_Lab")]
    pub is_lab: bool,
    #[serde(rename = "Is_Elective")]
    pub is_elective: bool,
    #[serde(rename = "Class_ID")]
    pub class_id: Option<String>,
    #[serde(rename = "Statistics")]
    pub statistics: CourseStatistics,
    #[serde(rename = "Session_IDs")]
    pub session_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseStatistics {
    #[serde(rename = "Total_Students")]
    pub total_students: u32,
    #[serde(rename = "Total_Classes")]
    pub total_classes: u32,
    #[serde(rename = "Total_Attendance_Records")]
    pub total_attendance_records: u32,
    #[serde(rename = "Present_Count")]
    pub present_count: u32,
    #[serde(rename = "Attendance_Percentage")]
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherSchedulePayload {
    pub teacher_id: String,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Start_Time")]
    pub start_time: String,
    #[serde(rename = "End_Time")]
    pub end_time: String,
    #[serde(rename = "Is_Extra_Class")]
    pub is_extra_class: bool,
    #[serde(rename = "Class_ID")]
    pub class_id: String,
    #[serde(rename = "Subject_Code")]
    pub subject_code: String,
    #[serde(rename = "Subject_Name")]
    pub subject_name: String,
    #[serde(rename = "Room_Number")]
    pub room_number: Option<String>,
    #[serde(rename = "Is_Lab")]
    pub is_lab: bool,
    #[serde(rename = "Is_Elective")]
    pub is_elective: bool,
    #[serde(rename = "Attendance_Stats")]
    pub attendance_stats: ScheduleStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleStats {
    #[serde(rename = "Total_Students")]
    pub total_students: u32,
    #[serde(rename = "Total_Classes")]
    pub total_classes: u32,
    #[serde(rename = "Overall_Attendance_Percentage")]
    pub overall_attendance_percentage: f64,
    #[serde(rename = "Recent_Trend")]
    pub recent_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub attendance_percentage: f64,
}

// ---- attendance register ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub teacher_id: String,
    pub tsa_id: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub class_id: Option<String>,
    pub is_lab: bool,
    pub is_elective: bool,
    pub dates: Vec<String>,
    pub attendance_data: Vec<RegisterRow>,
}

/// One roster member's row in the register grid; `None` means no record was
/// taken for that date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRow {
    pub student_id: String,
    pub student_name: String,
    pub attendance: HashMap<String, Option<bool>>,
}

// ---- department (HOD) analytics ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentAnalyticsPayload {
    pub branch_id: String,
    pub branch_name: String,
    pub total_students: u32,
    pub semester_analytics: HashMap<String, GroupStat>,
    pub class_analytics: HashMap<String, GroupStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStat {
    pub total_students: u32,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentTsaPayload {
    pub branch_id: String,
    pub branch_name: String,
    pub tsa_analytics: Vec<TsaRecord>,
}

/// One attendance analytics record per teacher-subject-allocation. Read-only
/// snapshot; only ever filtered and aggregated, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsaRecord {
    pub tsa_id: i64,
    pub semester: i64,
    pub teacher_id: String,
    pub teacher_name: String,
    pub subject_code: String,
    pub subject_name: String,
    pub class_id: Option<String>,
    pub is_lab: bool,
    pub is_elective: bool,
    pub total_students: u32,
    pub attendance_percentage: f64,
}
