use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use scolara_db::models::{Event, EventAudience};

use super::base::{BaseDao, DaoResult};

pub struct EventDao {
    pub base: BaseDao<Event>,
}

impl EventDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Event::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: String,
        description: Option<String>,
        start_time: DateTime,
        end_time: DateTime,
        audience: EventAudience,
        created_by: ObjectId,
    ) -> DaoResult<Event> {
        let now = DateTime::now();
        let event = Event {
            id: None,
            title,
            description,
            start_time,
            end_time,
            audience,
            created_by,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&event).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_upcoming(&self, limit: i64) -> DaoResult<Vec<Event>> {
        self.base
            .find_limited(
                doc! { "end_time": { "$gte": DateTime::now() } },
                doc! { "start_time": 1 },
                limit,
            )
            .await
    }
}
