use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::{Exam, ExamStatus, ExamType};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct ExamDao {
    pub base: BaseDao<Exam>,
}

impl ExamDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Exam::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: String,
        subject_id: ObjectId,
        grade_id: ObjectId,
        class_id: Option<ObjectId>,
        exam_date: DateTime,
        max_marks: f64,
        duration_mins: u32,
        exam_type: ExamType,
        created_by: ObjectId,
    ) -> DaoResult<Exam> {
        let now = DateTime::now();
        let exam = Exam {
            id: None,
            title,
            subject_id,
            grade_id,
            class_id,
            exam_date,
            max_marks,
            duration_mins,
            exam_type,
            status: ExamStatus::Scheduled,
            created_by,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&exam).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_filtered(
        &self,
        grade_id: Option<ObjectId>,
        subject_id: Option<ObjectId>,
        status: Option<ExamStatus>,
    ) -> DaoResult<Vec<Exam>> {
        let mut filter = Document::new();
        if let Some(gid) = grade_id {
            filter.insert("grade_id", gid);
        }
        if let Some(sid) = subject_id {
            filter.insert("subject_id", sid);
        }
        if let Some(st) = status {
            filter.insert("status", bson::to_bson(&st)?);
        }

        self.base
            .find_many(filter, Some(doc! { "exam_date": -1 }))
            .await
    }

    /// Next scheduled exams, soonest first.
    pub async fn find_upcoming(&self, limit: i64) -> DaoResult<Vec<Exam>> {
        self.base
            .find_limited(
                doc! {
                    "status": "scheduled",
                    "exam_date": { "$gte": DateTime::now() },
                },
                doc! { "exam_date": 1 },
                limit,
            )
            .await
    }

    pub async fn find_gradable(&self) -> DaoResult<Vec<Exam>> {
        self.base
            .find_many(
                doc! { "status": { "$in": ["completed", "published"] } },
                Some(doc! { "exam_date": -1 }),
            )
            .await
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DaoResult<Vec<Exam>> {
        self.base.find_many(doc! { "_id": { "$in": ids } }, None).await
    }

    /// Scheduled -> Ongoing, triggered by the first saved result. A no-op
    /// for any other current status.
    pub async fn mark_ongoing(&self, exam_id: ObjectId) -> DaoResult<()> {
        self.base
            .update_one(
                doc! { "_id": exam_id, "status": "scheduled" },
                doc! { "$set": { "status": "ongoing" } },
            )
            .await?;
        Ok(())
    }

    pub async fn mark_completed(&self, exam_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": exam_id, "status": { "$in": ["scheduled", "ongoing"] } },
                doc! { "$set": { "status": "completed" } },
            )
            .await
    }

    /// Publishing is irreversible; only ongoing or completed exams qualify.
    pub async fn publish(&self, exam_id: ObjectId) -> DaoResult<()> {
        let updated = self
            .base
            .update_one(
                doc! { "_id": exam_id, "status": { "$in": ["ongoing", "completed"] } },
                doc! { "$set": { "status": "published" } },
            )
            .await?;
        if !updated {
            return Err(DaoError::Validation(
                "Only ongoing or completed exams can be published".to_string(),
            ));
        }
        Ok(())
    }
}
