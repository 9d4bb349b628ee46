use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use scolara_db::models::{Conversation, LastMessage, Message};
use scolara_services::dao::base::{PaginatedResult, PaginationParams};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError, extractors::auth::AuthUser, routes::parse_id, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub participant_ids: Vec<String>,
    pub last_message: Option<LastMessageResponse>,
}

#[derive(Debug, Serialize)]
pub struct LastMessageResponse {
    pub content: String,
    pub sender_id: String,
    pub sent_at: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

fn to_conversation_response(conversation: Conversation) -> ConversationResponse {
    ConversationResponse {
        id: conversation.id.map(|id| id.to_hex()).unwrap_or_default(),
        participant_ids: conversation
            .participant_ids
            .iter()
            .map(|id| id.to_hex())
            .collect(),
        last_message: conversation.last_message.map(|m| LastMessageResponse {
            content: m.content,
            sender_id: m.sender_id.to_hex(),
            sent_at: m.sent_at.try_to_rfc3339_string().unwrap_or_default(),
        }),
    }
}

fn to_message_response(message: Message) -> MessageResponse {
    MessageResponse {
        id: message.id.map(|id| id.to_hex()).unwrap_or_default(),
        conversation_id: message.conversation_id.to_hex(),
        sender_id: message.sender_id.to_hex(),
        receiver_id: message.receiver_id.to_hex(),
        content: message.content,
        is_read: message.is_read,
        created_at: message.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let conversations = state.conversations.find_for_user(auth.user_id).await?;
    Ok(Json(
        conversations
            .into_iter()
            .map(to_conversation_response)
            .collect(),
    ))
}

pub async fn start(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<StartConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let other = parse_id("user_id", &body.user_id)?;
    if other == auth.user_id {
        return Err(ApiError::BadRequest(
            "Cannot start a conversation with yourself".to_string(),
        ));
    }
    state.users.base.find_by_id(other).await?;

    let conversation = state.conversations.find_or_create(auth.user_id, other).await?;
    Ok((StatusCode::CREATED, Json(to_conversation_response(conversation))))
}

pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResult<MessageResponse>>, ApiError> {
    let cid = parse_id("conversation_id", &id)?;
    if !state.conversations.is_participant(cid, auth.user_id).await? {
        return Err(ApiError::Forbidden("Not a participant".to_string()));
    }

    let page = state.messages.find_in_conversation(cid, &params).await?;

    Ok(Json(PaginatedResult {
        items: page.items.into_iter().map(to_message_response).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    body.validate()?;
    let cid = parse_id("conversation_id", &id)?;

    let conversation = state.conversations.base.find_by_id(cid).await?;
    let receiver_id = conversation
        .participant_ids
        .iter()
        .copied()
        .find(|&p| p != auth.user_id)
        .ok_or_else(|| ApiError::Forbidden("Not a participant".to_string()))?;
    if !conversation.participant_ids.contains(&auth.user_id) {
        return Err(ApiError::Forbidden("Not a participant".to_string()));
    }

    let message = state
        .messages
        .create(cid, auth.user_id, receiver_id, body.content)
        .await?;

    let last = LastMessage {
        content: message.content.clone(),
        sender_id: message.sender_id,
        sent_at: message.created_at,
    };
    state.conversations.update_last_message(cid, &last).await?;

    Ok((StatusCode::CREATED, Json(to_message_response(message))))
}

/// Mark every message addressed to the caller in this conversation read.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cid = parse_id("conversation_id", &id)?;
    if !state.conversations.is_participant(cid, auth.user_id).await? {
        return Err(ApiError::Forbidden("Not a participant".to_string()));
    }

    let marked = state.messages.mark_conversation_read(cid, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "marked": marked })))
}
