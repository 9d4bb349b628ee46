use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub subject_id: ObjectId,
    pub grade_id: ObjectId,
    pub class_id: Option<ObjectId>,
    pub exam_date: DateTime,
    pub max_marks: f64,
    pub duration_mins: u32,
    pub exam_type: ExamType,
    pub status: ExamStatus,
    pub created_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    UnitTest,
    Midterm,
    Final,
    Quiz,
    Assignment,
}

/// Scheduled -> Ongoing (first result saved) -> Completed -> Published.
/// Publishing is irreversible; there is no unpublish transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
    Published,
}

impl Exam {
    pub const COLLECTION: &'static str = "exams";
}
