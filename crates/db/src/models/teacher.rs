use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub subject_ids: Vec<ObjectId>,
    /// Classes this teacher teaches or supervises; attendance and teacher
    /// analytics are scoped to these.
    #[serde(default)]
    pub class_ids: Vec<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: Option<DateTime>,
}

impl Teacher {
    pub const COLLECTION: &'static str = "teachers";
}
