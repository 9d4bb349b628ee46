use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::DateTime;
use scolara_db::models::{Exam, ExamStatus, ExamType, UserRole};
use scolara_services::reporting::aggregate::{grade_letter, rate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError, extractors::auth::AuthUser, routes::parse_id, state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub subject_id: String,
    pub grade_id: String,
    pub class_id: Option<String>,
    /// RFC 3339 timestamp.
    pub exam_date: String,
    #[validate(range(min = 1.0))]
    pub max_marks: f64,
    #[validate(range(min = 5, max = 480))]
    pub duration_mins: u32,
    pub exam_type: ExamType,
}

#[derive(Debug, Deserialize)]
pub struct ListExamsQuery {
    pub grade_id: Option<String>,
    pub subject_id: Option<String>,
    pub status: Option<ExamStatus>,
}

#[derive(Debug, Deserialize)]
pub struct SaveResultsRequest {
    pub results: Vec<ResultInput>,
}

#[derive(Debug, Deserialize)]
pub struct ResultInput {
    pub student_id: String,
    pub marks: Option<f64>,
    #[serde(default)]
    pub is_absent: bool,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExamResponse {
    pub id: String,
    pub title: String,
    pub subject_id: String,
    pub grade_id: String,
    pub class_id: Option<String>,
    pub exam_date: String,
    pub max_marks: f64,
    pub duration_mins: u32,
    pub exam_type: ExamType,
    pub status: ExamStatus,
}

#[derive(Debug, Serialize)]
pub struct ExamResultsResponse {
    pub exam_id: String,
    pub title: String,
    pub max_marks: f64,
    pub results: Vec<ResultRow>,
}

#[derive(Debug, Serialize)]
pub struct ResultRow {
    pub student_id: String,
    pub student_name: String,
    pub marks: Option<f64>,
    /// Null for absent or ungraded entries, never 0.
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<&'static str>,
    pub is_absent: bool,
    pub is_graded: bool,
    pub remarks: Option<String>,
}

fn to_response(exam: Exam) -> ExamResponse {
    ExamResponse {
        id: exam.id.map(|id| id.to_hex()).unwrap_or_default(),
        title: exam.title,
        subject_id: exam.subject_id.to_hex(),
        grade_id: exam.grade_id.to_hex(),
        class_id: exam.class_id.map(|id| id.to_hex()),
        exam_date: exam.exam_date.try_to_rfc3339_string().unwrap_or_default(),
        max_marks: exam.max_marks,
        duration_mins: exam.duration_mins,
        exam_type: exam.exam_type,
        status: exam.status,
    }
}

/// Admin or a teacher of the exam's subject.
async fn require_exam_grader(
    state: &AppState,
    auth: &AuthUser,
    exam: &Exam,
) -> Result<(), ApiError> {
    match auth.role {
        UserRole::Admin => Ok(()),
        UserRole::Teacher => {
            if state.teachers.teaches_subject(auth.user_id, exam.subject_id).await? {
                Ok(())
            } else {
                Err(ApiError::Forbidden("Not your subject".to_string()))
            }
        }
        _ => Err(ApiError::Forbidden("Staff access required".to_string())),
    }
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListExamsQuery>,
) -> Result<Json<Vec<ExamResponse>>, ApiError> {
    let grade_id = query
        .grade_id
        .as_deref()
        .map(|v| parse_id("grade_id", v))
        .transpose()?;
    let subject_id = query
        .subject_id
        .as_deref()
        .map(|v| parse_id("subject_id", v))
        .transpose()?;

    // Students and parents only ever see published exams.
    let status = match auth.role {
        UserRole::Student | UserRole::Parent => Some(ExamStatus::Published),
        _ => query.status,
    };

    let exams = state.exams.find_filtered(grade_id, subject_id, status).await?;
    Ok(Json(exams.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateExamRequest>,
) -> Result<(StatusCode, Json<ExamResponse>), ApiError> {
    auth.require_staff()?;
    body.validate()?;

    let subject_id = parse_id("subject_id", &body.subject_id)?;
    let grade_id = parse_id("grade_id", &body.grade_id)?;
    let class_id = body
        .class_id
        .as_deref()
        .map(|v| parse_id("class_id", v))
        .transpose()?;

    if auth.role == UserRole::Teacher
        && !state.teachers.teaches_subject(auth.user_id, subject_id).await?
    {
        return Err(ApiError::Forbidden("Not your subject".to_string()));
    }

    let exam_date = DateTime::parse_rfc3339_str(&body.exam_date)
        .map_err(|_| ApiError::BadRequest("exam_date must be RFC 3339".to_string()))?;

    let exam = state
        .exams
        .create(
            body.title,
            subject_id,
            grade_id,
            class_id,
            exam_date,
            body.max_marks,
            body.duration_mins,
            body.exam_type,
            auth.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(exam))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ExamResponse>, ApiError> {
    let eid = parse_id("exam_id", &id)?;
    let exam = state.exams.base.find_by_id(eid).await?;

    if matches!(auth.role, UserRole::Student | UserRole::Parent)
        && exam.status != ExamStatus::Published
    {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }

    Ok(Json(to_response(exam)))
}

/// Save (or correct) a batch of results. The first save moves a scheduled
/// exam to ongoing.
pub async fn save_results(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<SaveResultsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let eid = parse_id("exam_id", &id)?;
    let exam = state.exams.base.find_by_id(eid).await?;
    require_exam_grader(&state, &auth, &exam).await?;

    if matches!(exam.status, ExamStatus::Cancelled | ExamStatus::Published) {
        return Err(ApiError::Validation(
            "Cannot save results for a cancelled or published exam".to_string(),
        ));
    }
    if body.results.is_empty() {
        return Err(ApiError::BadRequest("results must not be empty".to_string()));
    }

    for input in &body.results {
        if let Some(marks) = input.marks {
            if !(0.0..=exam.max_marks).contains(&marks) {
                return Err(ApiError::Validation(format!(
                    "marks must be between 0 and {}",
                    exam.max_marks
                )));
            }
        }
        if input.is_absent && input.marks.is_some() {
            return Err(ApiError::Validation(
                "An absent student cannot have marks".to_string(),
            ));
        }
    }

    let mut saved = 0u64;
    for input in &body.results {
        let student_id = parse_id("student_id", &input.student_id)?;
        state
            .exam_results
            .upsert_result(
                eid,
                student_id,
                input.marks,
                input.is_absent,
                input.remarks.clone(),
                auth.user_id,
            )
            .await?;
        saved += 1;
    }

    state.exams.mark_ongoing(eid).await?;

    Ok(Json(serde_json::json!({ "saved": saved })))
}

pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let eid = parse_id("exam_id", &id)?;
    let exam = state.exams.base.find_by_id(eid).await?;
    require_exam_grader(&state, &auth, &exam).await?;

    let completed = state.exams.mark_completed(eid).await?;
    if !completed {
        return Err(ApiError::Validation(
            "Only scheduled or ongoing exams can be completed".to_string(),
        ));
    }
    Ok(Json(serde_json::json!({ "status": "completed" })))
}

/// Irreversible: results become visible to students and parents.
pub async fn publish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let eid = parse_id("exam_id", &id)?;
    let exam = state.exams.base.find_by_id(eid).await?;
    require_exam_grader(&state, &auth, &exam).await?;

    state.exams.publish(eid).await?;
    Ok(Json(serde_json::json!({ "status": "published" })))
}

pub async fn results(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ExamResultsResponse>, ApiError> {
    let eid = parse_id("exam_id", &id)?;
    let exam = state.exams.base.find_by_id(eid).await?;
    require_exam_grader(&state, &auth, &exam).await?;

    let result_list = state.exam_results.find_by_exam(eid).await?;
    let student_ids: Vec<_> = result_list.iter().map(|r| r.student_id).collect();
    let students = state.students.find_by_ids(&student_ids).await?;
    let names = scolara_services::reporting::aggregate::correlate(students, |s| s.id);

    let rows = result_list
        .into_iter()
        .map(|r| {
            let percentage = match (r.is_absent, r.marks) {
                (true, _) | (_, None) => None,
                (false, Some(marks)) => Some(rate(marks, exam.max_marks)),
            };
            ResultRow {
                student_id: r.student_id.to_hex(),
                student_name: names
                    .get(&r.student_id)
                    .map(|s| format!("{} {}", s.name, s.surname))
                    .unwrap_or_else(|| "Unknown Student".to_string()),
                marks: if r.is_absent { None } else { r.marks },
                percentage,
                grade: percentage.map(grade_letter),
                is_absent: r.is_absent,
                is_graded: r.is_graded,
                remarks: r.remarks,
            }
        })
        .collect();

    Ok(Json(ExamResultsResponse {
        exam_id: eid.to_hex(),
        title: exam.title,
        max_marks: exam.max_marks,
        results: rows,
    }))
}
