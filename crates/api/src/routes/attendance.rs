use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use scolara_db::models::{Attendance, AttendanceStatus};
use scolara_services::reporting::reports::{AttendanceReport, attendance_report};
use scolara_services::reporting::{RawReportParams, ReportFilter};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::{
        auth::AuthUser,
        scope::{attendance_class_scope, require_class_ownership},
    },
    routes::parse_id,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DaySheetRequest {
    pub class_id: String,
    /// ISO date, YYYY-MM-DD.
    pub date: String,
    pub entries: Vec<DaySheetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DaySheetEntry {
    pub student_id: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListAttendanceQuery {
    pub class_id: Option<String>,
    pub student_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

fn to_response(record: Attendance) -> AttendanceResponse {
    AttendanceResponse {
        id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
        student_id: record.student_id.to_hex(),
        class_id: record.class_id.to_hex(),
        date: record.date.try_to_rfc3339_string().unwrap_or_default(),
        status: record.status,
        notes: record.notes,
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("{field} must be YYYY-MM-DD")))
}

/// Bulk day sheet for one class. Each entry is an atomic upsert keyed on
/// (student_id, date), so re-submitting the sheet corrects earlier statuses
/// instead of duplicating records.
pub async fn save_day_sheet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<DaySheetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_staff()?;
    let class_id = parse_id("class_id", &body.class_id)?;
    require_class_ownership(&state, &auth, class_id).await?;

    let date = parse_date("date", &body.date)?;
    if body.entries.is_empty() {
        return Err(ApiError::BadRequest("entries must not be empty".to_string()));
    }

    let mut saved = 0u64;
    for entry in &body.entries {
        let student_id = parse_id("student_id", &entry.student_id)?;
        state
            .attendance
            .upsert_day(
                student_id,
                class_id,
                date,
                entry.status,
                entry.notes.clone(),
                auth.user_id,
            )
            .await?;
        saved += 1;
    }

    Ok(Json(serde_json::json!({ "saved": saved })))
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListAttendanceQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let scope = attendance_class_scope(&state, &auth).await?;

    let today = Utc::now().date_naive();
    let start = query
        .start_date
        .as_deref()
        .map(|v| parse_date("start_date", v))
        .transpose()?
        .unwrap_or(today);
    let end = query
        .end_date
        .as_deref()
        .map(|v| parse_date("end_date", v))
        .transpose()?
        .unwrap_or(today);
    if start > end {
        return Err(ApiError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }
    let end_exclusive = end
        .succ_opt()
        .ok_or_else(|| ApiError::BadRequest("end_date out of range".to_string()))?;

    // An explicit class filter narrows within the caller's scope, never
    // widens it.
    let class_ids: Option<Vec<_>> = match (
        query.class_id.as_deref().map(|v| parse_id("class_id", v)).transpose()?,
        scope,
    ) {
        (Some(cid), Some(scope)) => {
            if !scope.contains(&cid) {
                return Err(ApiError::Forbidden("Not your class".to_string()));
            }
            Some(vec![cid])
        }
        (Some(cid), None) => Some(vec![cid]),
        (None, scope) => scope,
    };

    let student_ids = query
        .student_id
        .as_deref()
        .map(|v| parse_id("student_id", v))
        .transpose()?
        .map(|sid| vec![sid]);

    let records = state
        .attendance
        .find_range(start, end_exclusive, class_ids.as_deref(), student_ids.as_deref())
        .await?;

    Ok(Json(records.into_iter().map(to_response).collect()))
}

pub async fn analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RawReportParams>,
) -> Result<Json<AttendanceReport>, ApiError> {
    let scope = attendance_class_scope(&state, &auth).await?;
    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;

    if let (Some(cid), Some(scope)) = (filter.class_id, scope.as_ref()) {
        if !scope.contains(&cid) {
            return Err(ApiError::Forbidden("Not your class".to_string()));
        }
    }

    // Teachers additionally get the per-student breakdown for their classes.
    let include_by_student = scope.is_some();

    let report = attendance_report(
        &filter,
        scope.as_deref(),
        include_by_student,
        &state.attendance,
        &state.students,
        &state.classes,
    )
    .await?;

    Ok(Json(report))
}
