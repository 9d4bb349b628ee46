use bson::oid::ObjectId;
use scolara_db::models::{ExamStatus, Student};
use serde::Serialize;
use tracing::warn;

use crate::dao::base::DaoResult;
use crate::dao::{
    attendance::AttendanceDao, exam::ExamDao, exam_result::ExamResultDao, subject::SubjectDao,
};
use crate::reporting::aggregate::{
    AttendanceTally, JoinStats, SumCount, correlate, grade_letter, rate,
};
use crate::reporting::filter::DateWindow;

use super::attendance::TallyEntry;
use super::generated_at;

#[derive(Debug, Serialize)]
pub struct StudentPerformanceReport {
    pub title: String,
    pub generated_at: String,
    pub student_id: String,
    pub name: String,
    pub results: Vec<ResultEntry>,
    pub average_percentage: f64,
    pub overall_grade: &'static str,
    pub exams_taken: u64,
    pub exams_absent: u64,
    pub attendance: TallyEntry,
    pub skipped_records: u64,
}

#[derive(Debug, Serialize)]
pub struct ResultEntry {
    pub exam_id: String,
    pub exam_title: String,
    pub subject_name: String,
    pub exam_date: String,
    pub max_marks: f64,
    /// None while the result is absent or ungraded.
    pub marks: Option<f64>,
    /// None for absent or ungraded results, never 0.
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<&'static str>,
    pub status: &'static str,
}

/// One student's exam history plus their attendance summary for the window.
/// `published_only` hides unpublished exams from students and parents;
/// admin callers see everything.
pub async fn student_performance_report(
    student: &Student,
    window: DateWindow,
    published_only: bool,
    results: &ExamResultDao,
    exams: &ExamDao,
    subjects: &SubjectDao,
    attendance: &AttendanceDao,
) -> DaoResult<StudentPerformanceReport> {
    let student_id = student.id.ok_or(crate::dao::base::DaoError::NotFound)?;

    let (result_list, attendance_records) = tokio::try_join!(
        results.find_by_student(student_id),
        attendance.find_by_student(student_id, window.start, window.end_exclusive()),
    )?;

    let exam_ids: Vec<ObjectId> = result_list.iter().map(|r| r.exam_id).collect();
    let exam_map = correlate(exams.find_by_ids(&exam_ids).await?, |e| e.id);

    let subject_ids: Vec<ObjectId> = exam_map.values().map(|e| e.subject_id).collect();
    let subject_names = correlate(subjects.find_by_ids(&subject_ids).await?, |s| s.id);

    let mut joins = JoinStats::default();
    let mut average = SumCount::default();
    let mut exams_absent = 0u64;
    let mut entries = Vec::new();

    for result in &result_list {
        let Some(exam) = exam_map.get(&result.exam_id) else {
            joins.miss();
            continue;
        };
        joins.hit();

        if published_only && exam.status != ExamStatus::Published {
            continue;
        }

        let (marks, percentage, status) = if result.is_absent {
            exams_absent += 1;
            (None, None, "absent")
        } else if let Some(marks) = result.marks {
            let pct = rate(marks, exam.max_marks);
            average.add(pct);
            (Some(marks), Some(pct), "graded")
        } else {
            (None, None, "pending")
        };

        entries.push(ResultEntry {
            exam_id: result.exam_id.to_hex(),
            exam_title: exam.title.clone(),
            subject_name: subject_names
                .get(&exam.subject_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "Unknown Subject".to_string()),
            exam_date: exam.exam_date.try_to_rfc3339_string().unwrap_or_default(),
            max_marks: exam.max_marks,
            marks,
            percentage,
            grade: percentage.map(grade_letter),
            status,
        });
    }

    if joins.skipped > 0 {
        warn!(
            student_id = %student_id,
            skipped = joins.skipped,
            "student report dropped results with missing exams"
        );
    }

    let mut tally = AttendanceTally::default();
    for record in &attendance_records {
        tally.add(record.status);
    }

    Ok(StudentPerformanceReport {
        title: "Student Performance Report".to_string(),
        generated_at: generated_at(),
        student_id: student_id.to_hex(),
        name: format!("{} {}", student.name, student.surname),
        results: entries,
        average_percentage: average.mean(),
        overall_grade: if average.count > 0 {
            grade_letter(average.mean())
        } else {
            "N/A"
        },
        exams_taken: average.count,
        exams_absent,
        attendance: tally.into(),
        skipped_records: joins.skipped,
    })
}
