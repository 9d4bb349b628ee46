use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::ExamResult;

use super::base::{BaseDao, DaoResult};

pub struct ExamResultDao {
    pub base: BaseDao<ExamResult>,
}

impl ExamResultDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, ExamResult::COLLECTION),
        }
    }

    /// Save one student's result. Atomic upsert against the unique
    /// (exam_id, student_id) index; `is_graded` is derived here so the
    /// stored invariant (graded iff absent or marks present) cannot drift.
    pub async fn upsert_result(
        &self,
        exam_id: ObjectId,
        student_id: ObjectId,
        marks: Option<f64>,
        is_absent: bool,
        remarks: Option<String>,
        graded_by: ObjectId,
    ) -> DaoResult<()> {
        let is_graded = is_absent || marks.is_some();
        let now = DateTime::now();

        self.base
            .upsert_one(
                doc! { "exam_id": exam_id, "student_id": student_id },
                doc! {
                    "$set": {
                        "marks": marks,
                        "is_absent": is_absent,
                        "is_graded": is_graded,
                        "remarks": remarks,
                        "graded_by": graded_by,
                        "updated_at": now,
                    },
                    "$setOnInsert": {
                        "exam_id": exam_id,
                        "student_id": student_id,
                        "created_at": now,
                    },
                },
            )
            .await
    }

    pub async fn find_by_exam(&self, exam_id: ObjectId) -> DaoResult<Vec<ExamResult>> {
        self.base
            .find_many(doc! { "exam_id": exam_id }, Some(doc! { "student_id": 1 }))
            .await
    }

    pub async fn find_by_student(&self, student_id: ObjectId) -> DaoResult<Vec<ExamResult>> {
        self.base
            .find_many(doc! { "student_id": student_id }, Some(doc! { "created_at": 1 }))
            .await
    }

    pub async fn find_by_exams(&self, exam_ids: &[ObjectId]) -> DaoResult<Vec<ExamResult>> {
        self.base
            .find_many(doc! { "exam_id": { "$in": exam_ids } }, None)
            .await
    }
}
