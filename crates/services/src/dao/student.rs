use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::{Sex, Student};

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct StudentDao {
    pub base: BaseDao<Student>,
}

impl StudentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Student::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: ObjectId,
        name: String,
        surname: String,
        roll_no: u32,
        grade_id: ObjectId,
        class_id: ObjectId,
        parent_id: ObjectId,
        sex: Sex,
        birthday: Option<DateTime>,
    ) -> DaoResult<Student> {
        let now = DateTime::now();
        let student = Student {
            id: None,
            user_id,
            name,
            surname,
            roll_no,
            grade_id,
            class_id,
            parent_id,
            sex,
            birthday,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let id = self.base.insert_one(&student).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_active(&self, id: ObjectId) -> DaoResult<Student> {
        self.base
            .find_one(doc! { "_id": id, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Student>> {
        self.base
            .find_many(doc! { "deleted_at": null }, Some(doc! { "surname": 1, "name": 1 }))
            .await
    }

    pub async fn find_filtered(
        &self,
        grade_id: Option<ObjectId>,
        class_id: Option<ObjectId>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Student>> {
        let mut filter: Document = doc! { "deleted_at": null };
        if let Some(gid) = grade_id {
            filter.insert("grade_id", gid);
        }
        if let Some(cid) = class_id {
            filter.insert("class_id", cid);
        }

        self.base
            .find_paginated(filter, Some(doc! { "surname": 1, "name": 1 }), params)
            .await
    }

    pub async fn find_by_grade(&self, grade_id: ObjectId) -> DaoResult<Vec<Student>> {
        self.base
            .find_many(doc! { "grade_id": grade_id, "deleted_at": null }, None)
            .await
    }

    pub async fn find_by_class(&self, class_id: ObjectId) -> DaoResult<Vec<Student>> {
        self.base
            .find_many(
                doc! { "class_id": class_id, "deleted_at": null },
                Some(doc! { "roll_no": 1 }),
            )
            .await
    }

    pub async fn find_by_parent(&self, parent_id: ObjectId) -> DaoResult<Vec<Student>> {
        self.base
            .find_many(doc! { "parent_id": parent_id, "deleted_at": null }, None)
            .await
    }

    pub async fn find_by_user(&self, user_id: ObjectId) -> DaoResult<Student> {
        self.base
            .find_one(doc! { "user_id": user_id, "deleted_at": null })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DaoResult<Vec<Student>> {
        self.base
            .find_many(doc! { "_id": { "$in": ids }, "deleted_at": null }, None)
            .await
    }
}
