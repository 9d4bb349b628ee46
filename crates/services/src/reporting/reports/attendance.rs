use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::dao::base::DaoResult;
use crate::dao::{
    attendance::AttendanceDao, school_class::SchoolClassDao, student::StudentDao,
};
use crate::reporting::aggregate::{AttendanceTally, correlate, date_of, group_by_day};
use crate::reporting::filter::ReportFilter;

use super::generated_at;

#[derive(Debug, Serialize)]
pub struct AttendanceReport {
    pub title: String,
    pub generated_at: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: TallyEntry,
    pub by_date: Vec<DayEntry>,
    pub by_class: Vec<ClassEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_student: Option<Vec<StudentEntry>>,
}

#[derive(Debug, Serialize)]
pub struct TallyEntry {
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    pub total: u64,
    pub rate: f64,
}

impl From<AttendanceTally> for TallyEntry {
    fn from(t: AttendanceTally) -> Self {
        Self {
            present: t.present,
            absent: t.absent,
            late: t.late,
            excused: t.excused,
            total: t.total(),
            rate: t.rate(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub tally: TallyEntry,
}

#[derive(Debug, Serialize)]
pub struct ClassEntry {
    pub class_id: String,
    pub class_name: String,
    #[serde(flatten)]
    pub tally: TallyEntry,
}

#[derive(Debug, Serialize)]
pub struct StudentEntry {
    pub student_id: String,
    pub name: String,
    #[serde(flatten)]
    pub tally: TallyEntry,
}

/// Attendance analytics over the filter window. `scope_class_ids` narrows
/// the query for teacher callers; `include_by_student` adds the per-student
/// breakdown teachers see for their own classes.
pub async fn attendance_report(
    filter: &ReportFilter,
    scope_class_ids: Option<&[ObjectId]>,
    include_by_student: bool,
    attendance: &AttendanceDao,
    students: &StudentDao,
    classes: &SchoolClassDao,
) -> DaoResult<AttendanceReport> {
    let class_scope: Option<Vec<ObjectId>> = match (filter.class_id, scope_class_ids) {
        (Some(cid), _) => Some(vec![cid]),
        (None, Some(ids)) => Some(ids.to_vec()),
        (None, None) => None,
    };

    let records = attendance
        .find_range(
            filter.window.start,
            filter.window.end_exclusive(),
            class_scope.as_deref(),
            None,
        )
        .await?;

    let mut summary = AttendanceTally::default();
    let mut per_class: BTreeMap<ObjectId, AttendanceTally> = BTreeMap::new();
    let mut per_student: BTreeMap<ObjectId, AttendanceTally> = BTreeMap::new();
    for record in &records {
        summary.add(record.status);
        per_class.entry(record.class_id).or_default().add(record.status);
        if include_by_student {
            per_student.entry(record.student_id).or_default().add(record.status);
        }
    }

    let by_date = group_by_day(&records, |r| date_of(r.date), |r| r.status)
        .into_iter()
        .map(|(date, tally)| DayEntry { date, tally: tally.into() })
        .collect();

    // Batch-fetch names for display; a missing document falls back to a
    // sentinel rather than dropping the bucket.
    let class_ids: Vec<ObjectId> = per_class.keys().copied().collect();
    let class_names = correlate(classes.find_by_ids(&class_ids).await?, |c| c.id);

    let by_class = per_class
        .into_iter()
        .map(|(class_id, tally)| ClassEntry {
            class_id: class_id.to_hex(),
            class_name: class_names
                .get(&class_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown Class".to_string()),
            tally: tally.into(),
        })
        .collect();

    let by_student = if include_by_student {
        let student_ids: Vec<ObjectId> = per_student.keys().copied().collect();
        let names = correlate(students.find_by_ids(&student_ids).await?, |s| s.id);
        Some(
            per_student
                .into_iter()
                .map(|(student_id, tally)| StudentEntry {
                    student_id: student_id.to_hex(),
                    name: names
                        .get(&student_id)
                        .map(|s| format!("{} {}", s.name, s.surname))
                        .unwrap_or_else(|| "Unknown Student".to_string()),
                    tally: tally.into(),
                })
                .collect(),
        )
    } else {
        None
    };

    Ok(AttendanceReport {
        title: "Attendance Report".to_string(),
        generated_at: generated_at(),
        start_date: filter.window.start,
        end_date: filter.window.end,
        summary: summary.into(),
        by_date,
        by_class,
        by_student,
    })
}
