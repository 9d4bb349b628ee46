use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::Message;

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct MessageDao {
    pub base: BaseDao<Message>,
}

impl MessageDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Message::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        conversation_id: ObjectId,
        sender_id: ObjectId,
        receiver_id: ObjectId,
        content: String,
    ) -> DaoResult<Message> {
        let message = Message {
            id: None,
            conversation_id,
            sender_id,
            receiver_id,
            content,
            is_read: false,
            read_at: None,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&message).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_in_conversation(
        &self,
        conversation_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Message>> {
        self.base
            .find_paginated(
                doc! { "conversation_id": conversation_id },
                Some(doc! { "created_at": -1 }),
                params,
            )
            .await
    }

    /// Mark everything addressed to `receiver_id` in the conversation read.
    pub async fn mark_conversation_read(
        &self,
        conversation_id: ObjectId,
        receiver_id: ObjectId,
    ) -> DaoResult<u64> {
        let result = self
            .base
            .collection()
            .update_many(
                doc! {
                    "conversation_id": conversation_id,
                    "receiver_id": receiver_id,
                    "is_read": false,
                },
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await?;
        Ok(result.modified_count)
    }

    pub async fn unread_count(&self, receiver_id: ObjectId) -> DaoResult<u64> {
        self.base
            .count(doc! { "receiver_id": receiver_id, "is_read": false })
            .await
    }
}
