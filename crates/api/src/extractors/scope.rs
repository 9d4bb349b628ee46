//! Ownership checks that run before any report or CRUD query, so handlers
//! never fetch data the caller is not allowed to see.

use bson::oid::ObjectId;
use scolara_db::models::{Student, UserRole};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

/// Admin sees every student; a parent only their own children; a student
/// only themselves. Teachers go through class ownership instead.
pub async fn require_student_access(
    state: &AppState,
    auth: &AuthUser,
    student: &Student,
) -> Result<(), ApiError> {
    match auth.role {
        UserRole::Admin => Ok(()),
        UserRole::Parent if student.parent_id == auth.user_id => Ok(()),
        UserRole::Student if student.user_id == auth.user_id => Ok(()),
        UserRole::Teacher => {
            if state.teachers.owns_class(auth.user_id, student.class_id).await? {
                Ok(())
            } else {
                Err(ApiError::Forbidden("Not your class".to_string()))
            }
        }
        _ => Err(ApiError::Forbidden("Not your student".to_string())),
    }
}

/// Class ids a caller's attendance queries are confined to. Admin is
/// unscoped (`None`); a teacher gets the classes on their profile.
pub async fn attendance_class_scope(
    state: &AppState,
    auth: &AuthUser,
) -> Result<Option<Vec<ObjectId>>, ApiError> {
    match auth.role {
        UserRole::Admin => Ok(None),
        UserRole::Teacher => {
            let teacher = state
                .teachers
                .find_by_user(auth.user_id)
                .await
                .map_err(|_| ApiError::Forbidden("No teacher profile".to_string()))?;
            Ok(Some(teacher.class_ids))
        }
        _ => Err(ApiError::Forbidden("Staff access required".to_string())),
    }
}

pub async fn require_class_ownership(
    state: &AppState,
    auth: &AuthUser,
    class_id: ObjectId,
) -> Result<(), ApiError> {
    match auth.role {
        UserRole::Admin => Ok(()),
        UserRole::Teacher => {
            if state.teachers.owns_class(auth.user_id, class_id).await? {
                Ok(())
            } else {
                Err(ApiError::Forbidden("Not your class".to_string()))
            }
        }
        _ => Err(ApiError::Forbidden("Staff access required".to_string())),
    }
}
