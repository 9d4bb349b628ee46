use axum::{Json, extract::State, http::StatusCode};
use scolara_db::models::Subject;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError, extractors::auth::AuthUser, routes::parse_id, state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 2, max = 16))]
    pub code: String,
    #[serde(default)]
    pub teacher_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub teacher_ids: Vec<String>,
}

fn to_response(subject: Subject) -> SubjectResponse {
    SubjectResponse {
        id: subject.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: subject.name,
        code: subject.code,
        teacher_ids: subject.teacher_ids.iter().map(|id| id.to_hex()).collect(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
    let subjects = state.subjects.find_all().await?;
    Ok(Json(subjects.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    auth.require_admin()?;
    body.validate()?;

    let teacher_ids = body
        .teacher_ids
        .iter()
        .map(|t| parse_id("teacher_id", t))
        .collect::<Result<Vec<_>, _>>()?;

    let subject = state
        .subjects
        .create(body.name, body.code, teacher_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(subject))))
}
