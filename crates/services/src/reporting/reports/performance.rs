use bson::oid::ObjectId;
use scolara_db::models::ExamStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::dao::base::DaoResult;
use crate::dao::{
    exam::ExamDao, exam_result::ExamResultDao, student::StudentDao, subject::SubjectDao,
};
use crate::reporting::aggregate::{
    JoinStats, SumCount, correlate, distribution_letter, grade_letter, rate, top_n,
};
use crate::reporting::filter::ReportFilter;

use super::generated_at;

const TOP_PERFORMERS: usize = 10;

#[derive(Debug, Serialize)]
pub struct PerformanceReport {
    pub title: String,
    pub generated_at: String,
    pub exams_considered: u64,
    pub results_graded: u64,
    pub results_absent: u64,
    pub average_percentage: f64,
    pub by_subject: Vec<SubjectEntry>,
    pub grade_distribution: Vec<DistributionEntry>,
    pub top_performers: Vec<PerformerEntry>,
    /// Results dropped because their exam no longer exists.
    pub skipped_records: u64,
}

#[derive(Debug, Serialize)]
pub struct SubjectEntry {
    pub subject_id: String,
    pub subject_name: String,
    pub average_percentage: f64,
    pub results: u64,
}

#[derive(Debug, Serialize)]
pub struct DistributionEntry {
    pub grade: &'static str,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct PerformerEntry {
    pub student_id: String,
    pub name: String,
    pub average_percentage: f64,
    pub grade: &'static str,
    pub exams_taken: u64,
}

/// School-wide exam performance over completed and published exams.
pub async fn performance_report(
    filter: &ReportFilter,
    exams: &ExamDao,
    results: &ExamResultDao,
    subjects: &SubjectDao,
    students: &StudentDao,
) -> DaoResult<PerformanceReport> {
    let exam_list = exams
        .find_filtered(filter.grade_id, filter.subject_id, None)
        .await?;
    let exam_list: Vec<_> = exam_list
        .into_iter()
        .filter(|e| matches!(e.status, ExamStatus::Completed | ExamStatus::Published))
        .collect();

    let exam_ids: Vec<ObjectId> = exam_list.iter().filter_map(|e| e.id).collect();
    let result_list = results.find_by_exams(&exam_ids).await?;
    let exams_considered = exam_list.len() as u64;
    let exam_map = correlate(exam_list, |e| e.id);

    let mut joins = JoinStats::default();
    let mut overall = SumCount::default();
    let mut per_subject: BTreeMap<ObjectId, SumCount> = BTreeMap::new();
    let mut distribution: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut per_student: BTreeMap<ObjectId, SumCount> = BTreeMap::new();
    let mut results_absent = 0u64;

    for result in &result_list {
        let Some(exam) = exam_map.get(&result.exam_id) else {
            joins.miss();
            continue;
        };
        joins.hit();

        if result.is_absent {
            results_absent += 1;
            continue;
        }
        let Some(marks) = result.marks else {
            // Not yet graded; contributes to nothing.
            continue;
        };

        let pct = rate(marks, exam.max_marks);
        overall.add(pct);
        per_subject.entry(exam.subject_id).or_default().add(pct);
        *distribution.entry(distribution_letter(pct)).or_default() += 1;
        per_student.entry(result.student_id).or_default().add(pct);
    }

    if joins.skipped > 0 {
        warn!(skipped = joins.skipped, "performance report dropped results with missing exams");
    }

    let subject_ids: Vec<ObjectId> = per_subject.keys().copied().collect();
    let subject_names = correlate(subjects.find_by_ids(&subject_ids).await?, |s| s.id);
    let by_subject = per_subject
        .into_iter()
        .map(|(subject_id, acc)| SubjectEntry {
            subject_id: subject_id.to_hex(),
            subject_name: subject_names
                .get(&subject_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "Unknown Subject".to_string()),
            average_percentage: acc.mean(),
            results: acc.count,
        })
        .collect();

    let grade_distribution = ["A", "B", "C", "D", "F"]
        .into_iter()
        .map(|grade| DistributionEntry {
            grade,
            count: distribution.get(grade).copied().unwrap_or(0),
        })
        .collect();

    let averages: Vec<(ObjectId, SumCount)> = per_student.into_iter().collect();
    let top = top_n(averages, |(_, acc)| acc.mean(), TOP_PERFORMERS);
    let top_ids: Vec<ObjectId> = top.iter().map(|(id, _)| *id).collect();
    let student_names = correlate(students.find_by_ids(&top_ids).await?, |s| s.id);
    let top_performers = top
        .into_iter()
        .map(|(student_id, acc)| PerformerEntry {
            student_id: student_id.to_hex(),
            name: student_names
                .get(&student_id)
                .map(|s| format!("{} {}", s.name, s.surname))
                .unwrap_or_else(|| "Unknown Student".to_string()),
            average_percentage: acc.mean(),
            grade: grade_letter(acc.mean()),
            exams_taken: acc.count,
        })
        .collect();

    Ok(PerformanceReport {
        title: "Performance Report".to_string(),
        generated_at: generated_at(),
        exams_considered,
        results_graded: overall.count,
        results_absent,
        average_percentage: overall.mean(),
        by_subject,
        grade_distribution,
        top_performers,
        skipped_records: joins.skipped,
    })
}
