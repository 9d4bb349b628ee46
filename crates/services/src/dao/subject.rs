use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::Subject;

use super::base::{BaseDao, DaoResult};

pub struct SubjectDao {
    pub base: BaseDao<Subject>,
}

impl SubjectDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Subject::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        name: String,
        code: String,
        teacher_ids: Vec<ObjectId>,
    ) -> DaoResult<Subject> {
        let now = DateTime::now();
        let subject = Subject {
            id: None,
            name,
            code,
            teacher_ids,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&subject).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Subject>> {
        self.base.find_many(doc! {}, Some(doc! { "name": 1 })).await
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DaoResult<Vec<Subject>> {
        self.base.find_many(doc! { "_id": { "$in": ids } }, None).await
    }
}
