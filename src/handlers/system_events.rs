use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::Store;
use crate::error::ApiError;
use crate::models::SystemEvent;
use crate::AppState;

#[derive(Deserialize)]
pub struct EventQuery {
    pub event_type: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_system_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQuery>,
) -> Result<Json<Vec<SystemEvent>>, ApiError> {
    let limit = params.limit.unwrap_or(100).min(1000); // Max 1000 events

    let events = state
        .store
        .list_system_events(params.event_type, limit)
        .await?;

    Ok(Json(events))
}
