use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::dao::base::DaoResult;
use crate::dao::{grade::GradeDao, student::StudentDao};
use crate::reporting::aggregate::{correlate, date_of};
use crate::reporting::filter::ReportFilter;

use super::generated_at;

#[derive(Debug, Serialize)]
pub struct EnrollmentReport {
    pub title: String,
    pub generated_at: String,
    pub total_students: u64,
    pub by_grade: Vec<GradeEntry>,
    /// Admissions per calendar month inside the filter window.
    pub by_month: Vec<MonthEntry>,
}

#[derive(Debug, Serialize)]
pub struct GradeEntry {
    pub grade_id: String,
    pub grade_name: String,
    pub students: u64,
}

#[derive(Debug, Serialize)]
pub struct MonthEntry {
    pub month: String,
    pub admissions: u64,
}

/// Enrollment counts by grade plus the admission trend over the window.
pub async fn enrollment_report(
    filter: &ReportFilter,
    students: &StudentDao,
    grades: &GradeDao,
) -> DaoResult<EnrollmentReport> {
    let student_list = students.find_all().await?;

    let mut per_grade: BTreeMap<ObjectId, u64> = BTreeMap::new();
    let mut per_month: BTreeMap<String, u64> = BTreeMap::new();
    let window = filter.window;
    for student in &student_list {
        *per_grade.entry(student.grade_id).or_default() += 1;

        let admitted: NaiveDate = date_of(student.created_at);
        if admitted >= window.start && admitted <= window.end {
            *per_month.entry(admitted.format("%Y-%m").to_string()).or_default() += 1;
        }
    }

    let grade_ids: Vec<ObjectId> = per_grade.keys().copied().collect();
    let grade_names = correlate(grades.find_by_ids(&grade_ids).await?, |g| g.id);
    let by_grade = per_grade
        .into_iter()
        .map(|(grade_id, count)| GradeEntry {
            grade_id: grade_id.to_hex(),
            grade_name: grade_names
                .get(&grade_id)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| "Unknown Grade".to_string()),
            students: count,
        })
        .collect();

    let by_month = per_month
        .into_iter()
        .map(|(month, admissions)| MonthEntry { month, admissions })
        .collect();

    Ok(EnrollmentReport {
        title: "Enrollment Report".to_string(),
        generated_at: generated_at(),
        total_students: student_list.len() as u64,
        by_grade,
        by_month,
    })
}
