use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One student's outcome for one exam. `is_graded` holds exactly when the
/// student was marked absent or marks are present; percentage is only
/// meaningful for non-absent results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub exam_id: ObjectId,
    pub student_id: ObjectId,
    pub marks: Option<f64>,
    #[serde(default)]
    pub is_absent: bool,
    #[serde(default)]
    pub is_graded: bool,
    pub remarks: Option<String>,
    pub graded_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl ExamResult {
    pub const COLLECTION: &'static str = "exam_results";
}
