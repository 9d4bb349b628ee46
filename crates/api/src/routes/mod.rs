pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod conversation;
pub mod event;
pub mod exam;
pub mod fee;
pub mod grade;
pub mod notification;
pub mod school_class;
pub mod student;
pub mod subject;
pub mod teacher;

use bson::oid::ObjectId;

use crate::error::ApiError;

pub(crate) fn parse_id(field: &str, value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value)
        .map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}
