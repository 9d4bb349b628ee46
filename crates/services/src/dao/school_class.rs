use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::SchoolClass;

use super::base::{BaseDao, DaoResult};

pub struct SchoolClassDao {
    pub base: BaseDao<SchoolClass>,
}

impl SchoolClassDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, SchoolClass::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        name: String,
        grade_id: ObjectId,
        capacity: u32,
        supervisor_id: Option<ObjectId>,
    ) -> DaoResult<SchoolClass> {
        let now = DateTime::now();
        let class = SchoolClass {
            id: None,
            name,
            grade_id,
            capacity,
            supervisor_id,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&class).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_all(&self) -> DaoResult<Vec<SchoolClass>> {
        self.base.find_many(doc! {}, Some(doc! { "name": 1 })).await
    }

    pub async fn find_by_grade(&self, grade_id: ObjectId) -> DaoResult<Vec<SchoolClass>> {
        self.base
            .find_many(doc! { "grade_id": grade_id }, Some(doc! { "name": 1 }))
            .await
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DaoResult<Vec<SchoolClass>> {
        self.base.find_many(doc! { "_id": { "$in": ids } }, None).await
    }
}
