use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::Grade;

use super::base::{BaseDao, DaoResult};

pub struct GradeDao {
    pub base: BaseDao<Grade>,
}

impl GradeDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Grade::COLLECTION),
        }
    }

    pub async fn create(&self, level: i32, name: String) -> DaoResult<Grade> {
        let now = DateTime::now();
        let grade = Grade {
            id: None,
            level,
            name,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&grade).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Grade>> {
        self.base.find_many(doc! {}, Some(doc! { "level": 1 })).await
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DaoResult<Vec<Grade>> {
        self.base.find_many(doc! { "_id": { "$in": ids } }, None).await
    }
}
