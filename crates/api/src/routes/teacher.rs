use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::{Document, doc};
use scolara_db::models::{Teacher, UserRole};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError, extractors::auth::AuthUser, routes::parse_id, state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeacherRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[serde(default)]
    pub subject_ids: Vec<String>,
    #[serde(default)]
    pub class_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub subject_ids: Option<Vec<String>>,
    pub class_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct TeacherResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub surname: String,
    pub subject_ids: Vec<String>,
    pub class_ids: Vec<String>,
}

fn to_response(teacher: Teacher) -> TeacherResponse {
    TeacherResponse {
        id: teacher.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: teacher.user_id.to_hex(),
        name: teacher.name,
        surname: teacher.surname,
        subject_ids: teacher.subject_ids.iter().map(|id| id.to_hex()).collect(),
        class_ids: teacher.class_ids.iter().map(|id| id.to_hex()).collect(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<TeacherResponse>>, ApiError> {
    auth.require_staff()?;
    let teachers = state.teachers.find_all().await?;
    Ok(Json(teachers.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherResponse>), ApiError> {
    auth.require_admin()?;
    body.validate()?;

    let subject_ids = body
        .subject_ids
        .iter()
        .map(|s| parse_id("subject_id", s))
        .collect::<Result<Vec<_>, _>>()?;
    let class_ids = body
        .class_ids
        .iter()
        .map(|c| parse_id("class_id", c))
        .collect::<Result<Vec<_>, _>>()?;

    let password_hash = state.auth.hash_password(&body.password)?;
    let display_name = format!("{} {}", body.name, body.surname);
    let user = state
        .users
        .create(
            body.email,
            body.username,
            display_name,
            password_hash,
            UserRole::Teacher,
        )
        .await?;
    let user_id = user.id.ok_or(ApiError::Internal("missing id".to_string()))?;

    let teacher = state
        .teachers
        .create(user_id, body.name, body.surname, subject_ids, class_ids)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(teacher))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TeacherResponse>, ApiError> {
    auth.require_staff()?;
    let tid = parse_id("teacher_id", &id)?;
    let teacher = state.teachers.base.find_by_id(tid).await?;
    Ok(Json(to_response(teacher)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTeacherRequest>,
) -> Result<Json<TeacherResponse>, ApiError> {
    auth.require_admin()?;
    let tid = parse_id("teacher_id", &id)?;
    state.teachers.base.find_by_id(tid).await?;

    let mut set = Document::new();
    if let Some(name) = body.name {
        set.insert("name", name);
    }
    if let Some(surname) = body.surname {
        set.insert("surname", surname);
    }
    if let Some(ref subject_ids) = body.subject_ids {
        let ids = subject_ids
            .iter()
            .map(|s| parse_id("subject_id", s))
            .collect::<Result<Vec<_>, _>>()?;
        set.insert("subject_ids", ids);
    }
    if let Some(ref class_ids) = body.class_ids {
        let ids = class_ids
            .iter()
            .map(|c| parse_id("class_id", c))
            .collect::<Result<Vec<_>, _>>()?;
        set.insert("class_ids", ids);
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    state.teachers.base.update_by_id(tid, doc! { "$set": set }).await?;
    let teacher = state.teachers.base.find_by_id(tid).await?;
    Ok(Json(to_response(teacher)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;
    let tid = parse_id("teacher_id", &id)?;
    let teacher = state.teachers.base.find_by_id(tid).await?;

    state.teachers.base.soft_delete(tid).await?;
    state.users.base.soft_delete(teacher.user_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
