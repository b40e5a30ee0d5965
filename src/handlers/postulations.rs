//! Create-or-update of event applications, one per (event, email) pair.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::Store;
use crate::error::ApiError;
use crate::models::{
    Postulation, UpsertOutcome, UpsertPostulationRequest, UpsertPostulationResponse,
};
use crate::AppState;

/// First application for an (event, email) pair creates the record;
/// any further application just moves its availability window. The lookup
/// precedes the write, so the two branches are mutually exclusive.
pub async fn upsert_postulation(
    store: &dyn Store,
    req: UpsertPostulationRequest,
) -> Result<(UpsertOutcome, Postulation), ApiError> {
    let existing = store.find_postulations(req.event_id, &req.email).await?;

    match existing.into_iter().next() {
        None => {
            let postulation = store
                .insert_postulation(req.event_id, &req.email, &req.debut, &req.fin)
                .await?;

            let _ = store
                .record_event(
                    "postulation_created",
                    "postulation",
                    Some(postulation.id.to_string()),
                    Some(serde_json::json!({
                        "event_id": req.event_id,
                        "email": &req.email,
                    })),
                )
                .await;

            Ok((UpsertOutcome::Created, postulation))
        }
        Some(first) => {
            let postulation = store
                .update_postulation_window(first.id, &req.debut, &req.fin)
                .await?;

            let _ = store
                .record_event(
                    "postulation_updated",
                    "postulation",
                    Some(postulation.id.to_string()),
                    Some(serde_json::json!({
                        "event_id": req.event_id,
                        "email": &req.email,
                    })),
                )
                .await;

            Ok((UpsertOutcome::Updated, postulation))
        }
    }
}

#[derive(Deserialize)]
pub struct PostulationQuery {
    pub event_id: Option<Uuid>,
}

pub async fn list_postulations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostulationQuery>,
) -> Result<Json<Vec<Postulation>>, ApiError> {
    let postulations = state.store.list_postulations().await?;

    let postulations = match params.event_id {
        Some(event_id) => postulations
            .into_iter()
            .filter(|p| p.event_id == event_id)
            .collect(),
        None => postulations,
    };

    Ok(Json(postulations))
}

pub async fn upsert(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpsertPostulationRequest>,
) -> Result<Json<UpsertPostulationResponse>, ApiError> {
    let (outcome, postulation) = upsert_postulation(state.store.as_ref(), payload).await?;
    Ok(Json(UpsertPostulationResponse {
        outcome,
        postulation,
    }))
}
