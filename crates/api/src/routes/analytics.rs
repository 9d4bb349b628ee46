use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use scolara_services::reporting::reports::{
    AttendanceReport, EnrollmentReport, FeeReport, OverviewReport, PerformanceReport,
    attendance_report, enrollment_report, fee_report, overview_report, performance_report,
};
use scolara_services::reporting::{RawReportParams, ReportFilter};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

pub async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RawReportParams>,
) -> Result<Json<OverviewReport>, ApiError> {
    auth.require_admin()?;
    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;

    let report = overview_report(
        filter.window,
        &state.students,
        &state.teachers,
        &state.classes,
        &state.attendance,
        &state.fees,
        &state.exams,
    )
    .await?;

    Ok(Json(report))
}

pub async fn attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RawReportParams>,
) -> Result<Json<AttendanceReport>, ApiError> {
    auth.require_admin()?;
    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;

    let report = attendance_report(
        &filter,
        None,
        false,
        &state.attendance,
        &state.students,
        &state.classes,
    )
    .await?;

    Ok(Json(report))
}

pub async fn performance(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RawReportParams>,
) -> Result<Json<PerformanceReport>, ApiError> {
    auth.require_admin()?;
    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;

    let report = performance_report(
        &filter,
        &state.exams,
        &state.exam_results,
        &state.subjects,
        &state.students,
    )
    .await?;

    Ok(Json(report))
}

pub async fn fees(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RawReportParams>,
) -> Result<Json<FeeReport>, ApiError> {
    auth.require_admin()?;
    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;
    let report = fee_report(&filter, &state.fees).await?;
    Ok(Json(report))
}

pub async fn enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RawReportParams>,
) -> Result<Json<EnrollmentReport>, ApiError> {
    auth.require_admin()?;
    let filter = ReportFilter::from_params(&params, Utc::now().date_naive())?;
    let report = enrollment_report(&filter, &state.students, &state.grades).await?;
    Ok(Json(report))
}
