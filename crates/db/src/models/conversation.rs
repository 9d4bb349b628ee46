use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Exactly two participants.
    pub participant_ids: Vec<ObjectId>,
    /// Sorted "hexA:hexB" pair key; the unique index on it prevents two
    /// conversations between the same pair (a multikey index on the array
    /// could not express that).
    pub participant_key: String,
    pub last_message: Option<LastMessage>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Denormalized summary of the newest message, for conversation lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastMessage {
    pub content: String,
    pub sender_id: ObjectId,
    pub sent_at: DateTime,
}

impl Conversation {
    pub const COLLECTION: &'static str = "conversations";
}
