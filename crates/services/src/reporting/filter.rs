//! Query-string parameters to typed report filters.
//!
//! Parsing is strict: a malformed ObjectId or date is rejected as bad
//! input, never silently dropped or widened to a wildcard filter, since
//! that would change the scope of the resulting report. Well-formed but
//! inconsistent parameters (an inverted range, a zero period) are
//! validation errors.

use bson::oid::ObjectId;
use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::dao::base::{DaoError, DaoResult};

const DEFAULT_PERIOD_DAYS: u64 = 30;
const MAX_PERIOD_DAYS: u64 = 366;

/// Raw query parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReportParams {
    pub grade_id: Option<String>,
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub period: Option<String>,
}

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The day after `end`; range queries use `$gte start, $lt end+1` so
    /// the final day is fully covered.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end
            .checked_add_days(Days::new(1))
            .expect("date overflow")
    }

    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let start = today
            .checked_sub_days(Days::new(days.saturating_sub(1)))
            .expect("date underflow");
        Self { start, end: today }
    }
}

#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub grade_id: Option<ObjectId>,
    pub class_id: Option<ObjectId>,
    pub subject_id: Option<ObjectId>,
    pub status: Option<String>,
    pub window: DateWindow,
}

impl ReportFilter {
    pub fn from_params(raw: &RawReportParams, today: NaiveDate) -> DaoResult<Self> {
        let grade_id = parse_oid_opt("grade_id", raw.grade_id.as_deref())?;
        let class_id = parse_oid_opt("class_id", raw.class_id.as_deref())?;
        let subject_id = parse_oid_opt("subject_id", raw.subject_id.as_deref())?;

        let start_date = parse_date_opt("start_date", raw.start_date.as_deref())?;
        let end_date = parse_date_opt("end_date", raw.end_date.as_deref())?;

        let period = match raw.period.as_deref() {
            None => DEFAULT_PERIOD_DAYS,
            Some(p) => {
                let days: u64 = p.parse().map_err(|_| {
                    DaoError::InvalidInput(format!("period must be a number of days, got '{p}'"))
                })?;
                if days == 0 || days > MAX_PERIOD_DAYS {
                    return Err(DaoError::Validation(format!(
                        "period must be between 1 and {MAX_PERIOD_DAYS} days"
                    )));
                }
                days
            }
        };

        let window = match (start_date, end_date) {
            (Some(start), Some(end)) => {
                if start > end {
                    return Err(DaoError::Validation(
                        "start_date must not be after end_date".to_string(),
                    ));
                }
                DateWindow { start, end }
            }
            (Some(start), None) => DateWindow { start, end: today },
            (None, Some(end)) => DateWindow {
                start: end
                    .checked_sub_days(Days::new(period - 1))
                    .expect("date underflow"),
                end,
            },
            (None, None) => DateWindow::last_days(today, period),
        };

        Ok(Self {
            grade_id,
            class_id,
            subject_id,
            status: raw.status.clone(),
            window,
        })
    }
}

pub fn parse_oid(field: &str, value: &str) -> DaoResult<ObjectId> {
    ObjectId::parse_str(value)
        .map_err(|_| DaoError::InvalidInput(format!("{field} is not a valid id")))
}

fn parse_oid_opt(field: &str, value: Option<&str>) -> DaoResult<Option<ObjectId>> {
    value.map(|v| parse_oid(field, v)).transpose()
}

pub fn parse_date(field: &str, value: &str) -> DaoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DaoError::InvalidInput(format!("{field} must be an ISO date (YYYY-MM-DD)")))
}

fn parse_date_opt(field: &str, value: Option<&str>) -> DaoResult<Option<NaiveDate>> {
    value.map(|v| parse_date(field, v)).transpose()
}
