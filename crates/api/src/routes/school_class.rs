use axum::{Json, extract::State, http::StatusCode};
use scolara_db::models::SchoolClass;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError, extractors::auth::AuthUser, routes::parse_id, state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub grade_id: String,
    #[validate(range(min = 1, max = 200))]
    pub capacity: u32,
    pub supervisor_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassResponse {
    pub id: String,
    pub name: String,
    pub grade_id: String,
    pub capacity: u32,
    pub supervisor_id: Option<String>,
}

fn to_response(class: SchoolClass) -> ClassResponse {
    ClassResponse {
        id: class.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: class.name,
        grade_id: class.grade_id.to_hex(),
        capacity: class.capacity,
        supervisor_id: class.supervisor_id.map(|id| id.to_hex()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = state.classes.find_all().await?;
    Ok(Json(classes.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<ClassResponse>), ApiError> {
    auth.require_admin()?;
    body.validate()?;

    let grade_id = parse_id("grade_id", &body.grade_id)?;
    state.grades.base.find_by_id(grade_id).await?;

    let supervisor_id = body
        .supervisor_id
        .as_deref()
        .map(|v| parse_id("supervisor_id", v))
        .transpose()?;
    if let Some(sid) = supervisor_id {
        state.teachers.base.find_by_id(sid).await?;
    }

    let class = state
        .classes
        .create(body.name, grade_id, body.capacity, supervisor_id)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(class))))
}
