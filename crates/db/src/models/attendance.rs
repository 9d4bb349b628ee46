use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One record per student per day; the unique index on
/// (student_id, date) makes concurrent saves collapse into one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub class_id: ObjectId,
    /// Midnight UTC of the attendance day; time-of-day is always truncated.
    pub date: DateTime,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    /// User id of the teacher who recorded the entry.
    pub recorded_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl Attendance {
    pub const COLLECTION: &'static str = "attendance";
}
