use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::Store;
use crate::error::ApiError;
use crate::models::Croupier;
use crate::AppState;

pub async fn list_croupiers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Croupier>>, ApiError> {
    let croupiers = state.store.list_croupiers().await?;
    Ok(Json(croupiers))
}
