use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::UserRole;

/// Recipients are materialized at creation time from `target_audience`
/// (a snapshot, not a live query): users created later never retroactively
/// receive older notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub body: String,
    pub notification_type: NotificationType,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub target_audience: TargetAudience,
    pub target_grade_id: Option<ObjectId>,
    pub target_class_id: Option<ObjectId>,
    pub created_by: ObjectId,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub user_id: ObjectId,
    pub user_role: UserRole,
    #[serde(default)]
    pub is_read: bool,
    pub read_at: Option<DateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Announcement,
    Exam,
    Fee,
    Attendance,
    General,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    All,
    Students,
    Teachers,
    Parents,
    SpecificGrade,
    SpecificClass,
}

impl Notification {
    pub const COLLECTION: &'static str = "notifications";
}
