use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::{Conversation, LastMessage};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct ConversationDao {
    pub base: BaseDao<Conversation>,
}

impl ConversationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Conversation::COLLECTION),
        }
    }

    /// Find the conversation between two users, creating it if absent. The
    /// unique index on the sorted pair key absorbs concurrent creation; on a
    /// duplicate-key race the existing document is returned.
    pub async fn find_or_create(&self, a: ObjectId, b: ObjectId) -> DaoResult<Conversation> {
        let key = pair_key(a, b);

        if let Some(existing) = self.base.find_one(doc! { "participant_key": &key }).await? {
            return Ok(existing);
        }

        let now = DateTime::now();
        let conversation = Conversation {
            id: None,
            participant_ids: vec![a, b],
            participant_key: key.clone(),
            last_message: None,
            created_at: now,
            updated_at: now,
        };

        match self.base.insert_one(&conversation).await {
            Ok(id) => self.base.find_by_id(id).await,
            Err(DaoError::DuplicateKey(_)) => self
                .base
                .find_one(doc! { "participant_key": &key })
                .await?
                .ok_or(DaoError::NotFound),
            Err(e) => Err(e),
        }
    }

    pub async fn find_for_user(&self, user_id: ObjectId) -> DaoResult<Vec<Conversation>> {
        self.base
            .find_many(
                doc! { "participant_ids": user_id },
                Some(doc! { "updated_at": -1 }),
            )
            .await
    }

    pub async fn is_participant(
        &self,
        conversation_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<bool> {
        let found = self
            .base
            .find_one(doc! { "_id": conversation_id, "participant_ids": user_id })
            .await?;
        Ok(found.is_some())
    }

    pub async fn update_last_message(
        &self,
        conversation_id: ObjectId,
        last: &LastMessage,
    ) -> DaoResult<bool> {
        self.base
            .update_by_id(
                conversation_id,
                doc! { "$set": { "last_message": bson::to_bson(last)? } },
            )
            .await
    }
}

fn pair_key(a: ObjectId, b: ObjectId) -> String {
    let (lo, hi) = if a.to_hex() <= b.to_hex() { (a, b) } else { (b, a) };
    format!("{}:{}", lo.to_hex(), hi.to_hex())
}
