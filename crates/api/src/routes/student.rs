use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::{Document, doc, oid::ObjectId};
use chrono::Utc;
use scolara_db::models::{Sex, Student, UserRole};
use scolara_services::dao::attendance::midnight_utc;
use scolara_services::dao::base::{PaginatedResult, PaginationParams};
use scolara_services::reporting::reports::{StudentPerformanceReport, student_performance_report};
use scolara_services::reporting::{RawReportParams, ReportFilter};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, scope::require_student_access},
    routes::parse_id,
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
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
    pub roll_no: u32,
    pub grade_id: String,
    pub class_id: String,
    pub parent_id: String,
    pub sex: Sex,
    /// ISO date, YYYY-MM-DD.
    pub birthday: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub roll_no: Option<u32>,
    pub grade_id: Option<String>,
    pub class_id: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    pub grade_id: Option<String>,
    pub class_id: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub surname: String,
    pub roll_no: u32,
    pub grade_id: String,
    pub class_id: String,
    pub parent_id: String,
    pub sex: Sex,
    pub birthday: Option<String>,
}

fn to_response(student: Student) -> StudentResponse {
    StudentResponse {
        id: student.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: student.user_id.to_hex(),
        name: student.name,
        surname: student.surname,
        roll_no: student.roll_no,
        grade_id: student.grade_id.to_hex(),
        class_id: student.class_id.to_hex(),
        parent_id: student.parent_id.to_hex(),
        sex: student.sex,
        birthday: student
            .birthday
            .and_then(|d| d.try_to_rfc3339_string().ok()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListStudentsQuery>,
) -> Result<Json<PaginatedResult<StudentResponse>>, ApiError> {
    auth.require_staff()?;

    let grade_id = query
        .grade_id
        .as_deref()
        .map(|v| parse_id("grade_id", v))
        .transpose()?;
    let class_id = query
        .class_id
        .as_deref()
        .map(|v| parse_id("class_id", v))
        .transpose()?;

    let page = state
        .students
        .find_filtered(grade_id, class_id, &query.pagination)
        .await?;

    Ok(Json(PaginatedResult {
        items: page.items.into_iter().map(to_response).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }))
}

/// Creates the login account (role student) and the profile in one request.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    auth.require_admin()?;
    body.validate()?;

    let grade_id = parse_id("grade_id", &body.grade_id)?;
    let class_id = parse_id("class_id", &body.class_id)?;
    let parent_id = parse_id("parent_id", &body.parent_id)?;
    let birthday = body
        .birthday
        .as_deref()
        .map(|d| {
            chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map(midnight_utc)
                .map_err(|_| ApiError::BadRequest("birthday must be YYYY-MM-DD".to_string()))
        })
        .transpose()?;

    // Referenced entities must exist before the account is created.
    state.grades.base.find_by_id(grade_id).await?;
    state.classes.base.find_by_id(class_id).await?;
    let parent = state.users.base.find_by_id(parent_id).await?;
    if parent.role != UserRole::Parent {
        return Err(ApiError::BadRequest(
            "parent_id must reference a parent user".to_string(),
        ));
    }

    let password_hash = state.auth.hash_password(&body.password)?;
    let display_name = format!("{} {}", body.name, body.surname);
    let user = state
        .users
        .create(
            body.email,
            body.username,
            display_name,
            password_hash,
            UserRole::Student,
        )
        .await?;
    let user_id = user.id.ok_or(ApiError::Internal("missing id".to_string()))?;

    let student = state
        .students
        .create(
            user_id,
            body.name,
            body.surname,
            body.roll_no,
            grade_id,
            class_id,
            parent_id,
            body.sex,
            birthday,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(student))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudentResponse>, ApiError> {
    let sid = parse_id("student_id", &id)?;
    let student = state.students.find_active(sid).await?;
    require_student_access(&state, &auth, &student).await?;
    Ok(Json(to_response(student)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    auth.require_admin()?;
    let sid = parse_id("student_id", &id)?;
    state.students.find_active(sid).await?;

    let mut set = Document::new();
    if let Some(name) = body.name {
        set.insert("name", name);
    }
    if let Some(surname) = body.surname {
        set.insert("surname", surname);
    }
    if let Some(roll_no) = body.roll_no {
        set.insert("roll_no", roll_no as i64);
    }
    if let Some(ref gid) = body.grade_id {
        set.insert("grade_id", parse_id("grade_id", gid)?);
    }
    if let Some(ref cid) = body.class_id {
        set.insert("class_id", parse_id("class_id", cid)?);
    }
    if let Some(ref pid) = body.parent_id {
        set.insert("parent_id", parse_id("parent_id", pid)?);
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    state.students.base.update_by_id(sid, doc! { "$set": set }).await?;
    let student = state.students.base.find_by_id(sid).await?;
    Ok(Json(to_response(student)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;
    let sid = parse_id("student_id", &id)?;
    let student = state.students.find_active(sid).await?;

    state.students.base.soft_delete(sid).await?;
    state.users.base.soft_delete(student.user_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn performance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(params): Query<RawReportParams>,
) -> Result<Json<StudentPerformanceReport>, ApiError> {
    let sid = parse_id("student_id", &id)?;
    let student = state.students.find_active(sid).await?;
    require_student_access(&state, &auth, &student).await?;

    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;
    // Students and parents only see published exams.
    let published_only = matches!(auth.role, UserRole::Student | UserRole::Parent);

    let report = student_performance_report(
        &student,
        filter.window,
        published_only,
        &state.exam_results,
        &state.exams,
        &state.subjects,
        &state.attendance,
    )
    .await?;

    Ok(Json(report))
}
