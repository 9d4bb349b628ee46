use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::{
    Notification, NotificationPriority, NotificationType, Recipient, TargetAudience,
};

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    /// Persist a notification with its already-resolved recipient list.
    /// The list is a snapshot as of creation time and is never recomputed.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: String,
        body: String,
        notification_type: NotificationType,
        priority: NotificationPriority,
        target_audience: TargetAudience,
        target_grade_id: Option<ObjectId>,
        target_class_id: Option<ObjectId>,
        created_by: ObjectId,
        recipients: Vec<Recipient>,
    ) -> DaoResult<Notification> {
        let notification = Notification {
            id: None,
            title,
            body,
            notification_type,
            priority,
            target_audience,
            target_grade_id,
            target_class_id,
            created_by,
            recipients,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&notification).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_user(
        &self,
        user_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Notification>> {
        self.base
            .find_paginated(
                doc! { "recipients.user_id": user_id },
                Some(doc! { "created_at": -1 }),
                params,
            )
            .await
    }

    pub async fn unread_count(&self, user_id: ObjectId) -> DaoResult<u64> {
        self.base
            .count(doc! {
                "recipients": {
                    "$elemMatch": { "user_id": user_id, "is_read": false },
                },
            })
            .await
    }

    /// Mark this recipient's entry read. Only the matching array element is
    /// touched; other recipients' read state is independent.
    pub async fn mark_read(&self, notification_id: ObjectId, user_id: ObjectId) -> DaoResult<bool> {
        let result = self
            .base
            .collection()
            .update_one(
                doc! { "_id": notification_id, "recipients.user_id": user_id },
                doc! {
                    "$set": {
                        "recipients.$.is_read": true,
                        "recipients.$.read_at": DateTime::now(),
                    },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
