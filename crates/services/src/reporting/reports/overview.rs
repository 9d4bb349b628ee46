use bson::doc;
use chrono::Utc;
use scolara_db::models::{ExamType, FeeStatus};
use serde::Serialize;

use crate::dao::base::DaoResult;
use crate::dao::{
    attendance::AttendanceDao, exam::ExamDao, fee::FeeDao, school_class::SchoolClassDao,
    student::StudentDao, teacher::TeacherDao,
};
use crate::reporting::aggregate::{AttendanceTally, rate, round2};
use crate::reporting::filter::DateWindow;

use super::generated_at;

const UPCOMING_EXAMS: i64 = 5;

#[derive(Debug, Serialize)]
pub struct OverviewReport {
    pub title: String,
    pub generated_at: String,
    pub students: u64,
    pub teachers: u64,
    pub classes: u64,
    pub attendance_today: TodayAttendance,
    pub fees: FeeSnapshot,
    pub upcoming_exams: Vec<UpcomingExam>,
}

#[derive(Debug, Serialize)]
pub struct TodayAttendance {
    pub recorded: u64,
    pub present: u64,
    pub rate: f64,
}

#[derive(Debug, Serialize)]
pub struct FeeSnapshot {
    pub collected: f64,
    pub pending: f64,
    pub overdue: f64,
    pub collection_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct UpcomingExam {
    pub exam_id: String,
    pub title: String,
    pub exam_date: String,
    pub exam_type: ExamType,
}

/// Admin dashboard summary. The six underlying queries are independent and
/// run concurrently.
pub async fn overview_report(
    window: DateWindow,
    students: &StudentDao,
    teachers: &TeacherDao,
    classes: &SchoolClassDao,
    attendance: &AttendanceDao,
    fees: &FeeDao,
    exams: &ExamDao,
) -> DaoResult<OverviewReport> {
    let today = Utc::now().date_naive();
    let tomorrow = today.succ_opt().expect("date overflow");

    let (student_count, teacher_count, class_count, today_records, payments, upcoming) = tokio::try_join!(
        students.base.count(doc! { "deleted_at": null }),
        teachers.base.count(doc! { "deleted_at": null }),
        classes.base.count(doc! {}),
        attendance.find_range(today, tomorrow, None, None),
        fees.find_in_window(window.start, window.end_exclusive()),
        exams.find_upcoming(UPCOMING_EXAMS),
    )?;

    let mut tally = AttendanceTally::default();
    for record in &today_records {
        tally.add(record.status);
    }

    let mut collected = 0.0;
    let mut pending = 0.0;
    let mut overdue = 0.0;
    for payment in &payments {
        match payment.status {
            FeeStatus::Paid => collected += payment.amount,
            FeeStatus::Pending => pending += payment.amount,
            FeeStatus::Overdue => overdue += payment.amount,
        }
    }

    let upcoming_exams = upcoming
        .into_iter()
        .map(|e| UpcomingExam {
            exam_id: e.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: e.title,
            exam_date: e.exam_date.try_to_rfc3339_string().unwrap_or_default(),
            exam_type: e.exam_type,
        })
        .collect();

    Ok(OverviewReport {
        title: "School Overview".to_string(),
        generated_at: generated_at(),
        students: student_count,
        teachers: teacher_count,
        classes: class_count,
        attendance_today: TodayAttendance {
            recorded: tally.total(),
            present: tally.present,
            rate: tally.rate(),
        },
        fees: FeeSnapshot {
            collected: round2(collected),
            pending: round2(pending),
            overdue: round2(overdue),
            collection_rate: rate(collected, collected + pending + overdue),
        },
        upcoming_exams,
    })
}
