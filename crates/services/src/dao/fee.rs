use bson::{DateTime, Document, doc, oid::ObjectId};
use chrono::NaiveDate;
use mongodb::Database;
use scolara_db::models::{FeePayment, FeeStatus};

use super::attendance::midnight_utc;
use super::base::{BaseDao, DaoResult};

pub struct FeeDao {
    pub base: BaseDao<FeePayment>,
}

impl FeeDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, FeePayment::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        student_id: ObjectId,
        amount: f64,
        status: FeeStatus,
        due_date: DateTime,
        paid_at: Option<DateTime>,
        academic_year: String,
    ) -> DaoResult<FeePayment> {
        let now = DateTime::now();
        let payment = FeePayment {
            id: None,
            student_id,
            amount,
            status,
            due_date,
            paid_at,
            academic_year,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&payment).await?;
        self.base.find_by_id(id).await
    }

    pub async fn mark_paid(&self, payment_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                payment_id,
                doc! { "$set": { "status": "paid", "paid_at": DateTime::now() } },
            )
            .await
    }

    pub async fn find_filtered(
        &self,
        student_id: Option<ObjectId>,
        status: Option<FeeStatus>,
        academic_year: Option<&str>,
    ) -> DaoResult<Vec<FeePayment>> {
        let mut filter = Document::new();
        if let Some(sid) = student_id {
            filter.insert("student_id", sid);
        }
        if let Some(st) = status {
            filter.insert("status", bson::to_bson(&st)?);
        }
        if let Some(year) = academic_year {
            filter.insert("academic_year", year);
        }

        self.base
            .find_many(filter, Some(doc! { "due_date": 1 }))
            .await
    }

    /// Payments whose due date falls inside the window, regardless of status;
    /// the fee report partitions them by status afterwards.
    pub async fn find_in_window(
        &self,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> DaoResult<Vec<FeePayment>> {
        self.base
            .find_many(
                doc! {
                    "due_date": { "$gte": midnight_utc(start), "$lt": midnight_utc(end_exclusive) },
                },
                Some(doc! { "due_date": 1 }),
            )
            .await
    }
}
