use bson::{DateTime, Document, doc, oid::ObjectId};
use chrono::NaiveDate;
use mongodb::Database;
use scolara_db::models::{Attendance, AttendanceStatus};

use super::base::{BaseDao, DaoResult};

pub struct AttendanceDao {
    pub base: BaseDao<Attendance>,
}

impl AttendanceDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Attendance::COLLECTION),
        }
    }

    /// Save one student's status for one day. A single atomic upsert against
    /// the unique (student_id, date) index; re-submitting the same day
    /// overwrites the previous status instead of duplicating the record.
    pub async fn upsert_day(
        &self,
        student_id: ObjectId,
        class_id: ObjectId,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<String>,
        recorded_by: ObjectId,
    ) -> DaoResult<()> {
        let day = midnight_utc(date);
        let now = DateTime::now();

        self.base
            .upsert_one(
                doc! { "student_id": student_id, "date": day },
                doc! {
                    "$set": {
                        "class_id": class_id,
                        "status": bson::to_bson(&status)?,
                        "notes": notes,
                        "recorded_by": recorded_by,
                        "updated_at": now,
                    },
                    "$setOnInsert": {
                        "student_id": student_id,
                        "date": day,
                        "created_at": now,
                    },
                },
            )
            .await
    }

    pub async fn find_range(
        &self,
        start: NaiveDate,
        end_exclusive: NaiveDate,
        class_ids: Option<&[ObjectId]>,
        student_ids: Option<&[ObjectId]>,
    ) -> DaoResult<Vec<Attendance>> {
        let mut filter: Document = doc! {
            "date": { "$gte": midnight_utc(start), "$lt": midnight_utc(end_exclusive) },
        };
        if let Some(cids) = class_ids {
            filter.insert("class_id", doc! { "$in": cids });
        }
        if let Some(ids) = student_ids {
            filter.insert("student_id", doc! { "$in": ids });
        }

        self.base.find_many(filter, Some(doc! { "date": 1 })).await
    }

    pub async fn find_by_student(
        &self,
        student_id: ObjectId,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> DaoResult<Vec<Attendance>> {
        self.base
            .find_many(
                doc! {
                    "student_id": student_id,
                    "date": { "$gte": midnight_utc(start), "$lt": midnight_utc(end_exclusive) },
                },
                Some(doc! { "date": 1 }),
            )
            .await
    }
}

pub fn midnight_utc(date: NaiveDate) -> DateTime {
    let dt = date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();
    DateTime::from_chrono(dt)
}
