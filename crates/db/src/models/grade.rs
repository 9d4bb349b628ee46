use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// An academic level ("Grade 5"), not to be confused with an exam grade
/// letter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub level: i32,
    pub name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Grade {
    pub const COLLECTION: &'static str = "grades";
}
