use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A section within a grade ("5-B"), with a capacity and an optional
/// supervising teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolClass {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub grade_id: ObjectId,
    pub capacity: u32,
    pub supervisor_id: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl SchoolClass {
    pub const COLLECTION: &'static str = "classes";
}
