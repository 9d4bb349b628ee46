use axum::{Json, extract::State, http::StatusCode};
use scolara_db::models::Grade;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGradeRequest {
    #[validate(range(min = 1, max = 12))]
    pub level: i32,
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub id: String,
    pub level: i32,
    pub name: String,
}

fn to_response(grade: Grade) -> GradeResponse {
    GradeResponse {
        id: grade.id.map(|id| id.to_hex()).unwrap_or_default(),
        level: grade.level,
        name: grade.name,
    }
}

pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<GradeResponse>>, ApiError> {
    let grades = state.grades.find_all().await?;
    Ok(Json(grades.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateGradeRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), ApiError> {
    auth.require_admin()?;
    body.validate()?;

    let grade = state.grades.create(body.level, body.name).await?;
    Ok((StatusCode::CREATED, Json(to_response(grade))))
}
