use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::Teacher;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct TeacherDao {
    pub base: BaseDao<Teacher>,
}

impl TeacherDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Teacher::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        name: String,
        surname: String,
        subject_ids: Vec<ObjectId>,
        class_ids: Vec<ObjectId>,
    ) -> DaoResult<Teacher> {
        let now = DateTime::now();
        let teacher = Teacher {
            id: None,
            user_id,
            name,
            surname,
            subject_ids,
            class_ids,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let id = self.base.insert_one(&teacher).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Teacher>> {
        self.base
            .find_many(doc! { "deleted_at": null }, Some(doc! { "surname": 1, "name": 1 }))
            .await
    }

    pub async fn find_by_user(&self, user_id: ObjectId) -> DaoResult<Teacher> {
        self.base
            .find_one(doc! { "user_id": user_id, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Whether the teacher (by login user id) teaches or supervises a class.
    pub async fn owns_class(&self, user_id: ObjectId, class_id: ObjectId) -> DaoResult<bool> {
        let found = self
            .base
            .find_one(doc! {
                "user_id": user_id,
                "class_ids": class_id,
                "deleted_at": null,
            })
            .await?;
        Ok(found.is_some())
    }

    pub async fn teaches_subject(
        &self,
        user_id: ObjectId,
        subject_id: ObjectId,
    ) -> DaoResult<bool> {
        let found = self
            .base
            .find_one(doc! {
                "user_id": user_id,
                "subject_ids": subject_id,
                "deleted_at": null,
            })
            .await?;
        Ok(found.is_some())
    }
}
