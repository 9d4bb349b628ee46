use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use bson::DateTime;
use scolara_db::models::{Event, EventAudience};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339 timestamps.
    pub start_time: String,
    pub end_time: String,
    pub audience: Option<EventAudience>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub audience: EventAudience,
}

fn to_response(event: Event) -> EventResponse {
    EventResponse {
        id: event.id.map(|id| id.to_hex()).unwrap_or_default(),
        title: event.title,
        description: event.description,
        start_time: event.start_time.try_to_rfc3339_string().unwrap_or_default(),
        end_time: event.end_time.try_to_rfc3339_string().unwrap_or_default(),
        audience: event.audience,
    }
}

pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 200);
    let events = state.events.find_upcoming(limit).await?;
    Ok(Json(events.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    auth.require_staff()?;
    body.validate()?;

    let start_time = DateTime::parse_rfc3339_str(&body.start_time)
        .map_err(|_| ApiError::BadRequest("start_time must be RFC 3339".to_string()))?;
    let end_time = DateTime::parse_rfc3339_str(&body.end_time)
        .map_err(|_| ApiError::BadRequest("end_time must be RFC 3339".to_string()))?;
    if end_time < start_time {
        return Err(ApiError::BadRequest(
            "end_time must not be before start_time".to_string(),
        ));
    }

    let event = state
        .events
        .create(
            body.title,
            body.description,
            start_time,
            end_time,
            body.audience.unwrap_or(EventAudience::All),
            auth.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(event))))
}
