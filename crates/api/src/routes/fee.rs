use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::DateTime;
use chrono::Utc;
use scolara_db::models::{FeePayment, FeeStatus, UserRole};
use scolara_services::reporting::reports::{FeeReport, fee_report};
use scolara_services::reporting::{RawReportParams, ReportFilter};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError, extractors::auth::AuthUser, routes::parse_id, state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeeRequest {
    pub student_id: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub status: Option<FeeStatus>,
    /// RFC 3339 timestamp.
    pub due_date: String,
    #[validate(length(min = 4, max = 16))]
    pub academic_year: String,
}

#[derive(Debug, Deserialize)]
pub struct ListFeesQuery {
    pub student_id: Option<String>,
    pub status: Option<FeeStatus>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeeResponse {
    pub id: String,
    pub student_id: String,
    pub amount: f64,
    pub status: FeeStatus,
    pub due_date: String,
    pub paid_at: Option<String>,
    pub academic_year: String,
}

fn to_response(payment: FeePayment) -> FeeResponse {
    FeeResponse {
        id: payment.id.map(|id| id.to_hex()).unwrap_or_default(),
        student_id: payment.student_id.to_hex(),
        amount: payment.amount,
        status: payment.status,
        due_date: payment.due_date.try_to_rfc3339_string().unwrap_or_default(),
        paid_at: payment
            .paid_at
            .and_then(|d| d.try_to_rfc3339_string().ok()),
        academic_year: payment.academic_year,
    }
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFeesQuery>,
) -> Result<Json<Vec<FeeResponse>>, ApiError> {
    let requested_student = query
        .student_id
        .as_deref()
        .map(|v| parse_id("student_id", v))
        .transpose()?;

    // Parents and students are confined to their own records; an explicit
    // student filter must fall inside that set.
    let payments = match auth.role {
        UserRole::Admin => {
            state
                .fees
                .find_filtered(requested_student, query.status, query.academic_year.as_deref())
                .await?
        }
        UserRole::Parent => {
            let children = state.students.find_by_parent(auth.user_id).await?;
            let child_ids: Vec<_> = children.iter().filter_map(|s| s.id).collect();
            match requested_student {
                Some(sid) if !child_ids.contains(&sid) => {
                    return Err(ApiError::Forbidden("Not your student".to_string()));
                }
                Some(sid) => {
                    state
                        .fees
                        .find_filtered(Some(sid), query.status, query.academic_year.as_deref())
                        .await?
                }
                None => {
                    let mut all = Vec::new();
                    for sid in child_ids {
                        all.extend(
                            state
                                .fees
                                .find_filtered(
                                    Some(sid),
                                    query.status,
                                    query.academic_year.as_deref(),
                                )
                                .await?,
                        );
                    }
                    all
                }
            }
        }
        UserRole::Student => {
            let student = state
                .students
                .find_by_user(auth.user_id)
                .await
                .map_err(|_| ApiError::Forbidden("No student profile".to_string()))?;
            state
                .fees
                .find_filtered(student.id, query.status, query.academic_year.as_deref())
                .await?
        }
        UserRole::Teacher => {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
    };

    Ok(Json(payments.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateFeeRequest>,
) -> Result<(StatusCode, Json<FeeResponse>), ApiError> {
    auth.require_admin()?;
    body.validate()?;

    let student_id = parse_id("student_id", &body.student_id)?;
    state.students.find_active(student_id).await?;

    let due_date = DateTime::parse_rfc3339_str(&body.due_date)
        .map_err(|_| ApiError::BadRequest("due_date must be RFC 3339".to_string()))?;

    let status = body.status.unwrap_or(FeeStatus::Pending);
    let paid_at = (status == FeeStatus::Paid).then(DateTime::now);

    let payment = state
        .fees
        .create(student_id, body.amount, status, due_date, paid_at, body.academic_year)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(payment))))
}

pub async fn pay(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FeeResponse>, ApiError> {
    auth.require_admin()?;
    let pid = parse_id("payment_id", &id)?;
    state.fees.base.find_by_id(pid).await?;

    state.fees.mark_paid(pid).await?;
    let payment = state.fees.base.find_by_id(pid).await?;
    Ok(Json(to_response(payment)))
}

pub async fn analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RawReportParams>,
) -> Result<Json<FeeReport>, ApiError> {
    auth.require_admin()?;
    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;
    let report = fee_report(&filter, &state.fees).await?;
    Ok(Json(report))
}
