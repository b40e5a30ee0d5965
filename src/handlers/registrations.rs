//! Pending registrations and their promotion to croupier records.
//!
//! A signup is parked in `pending_registrations` under a key derived from the
//! email until the identity provider reports the address verified; the
//! confirm endpoint then promotes it to a `croupiers` record exactly once.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::db::Store;
use crate::error::ApiError;
use crate::models::{
    ConfirmRegistrationRequest, ConfirmRegistrationResponse, NewCroupier, PendingRegistration,
    SavePendingRequest,
};
use crate::AppState;

/// Priority rank assigned to every freshly promoted croupier.
pub const DEFAULT_PRIORITE: i32 = 3;

/// Document key for a pending registration: lower-cased email with `.`
/// replaced by `_`. The mapping collides for emails differing only by case or
/// by a literal underscore vs. a dot; that is a known, accepted limitation of
/// the keying scheme, and re-registration with the same email deliberately
/// lands on the same key to overwrite the previous record.
pub fn normalize_email_key(email: &str) -> String {
    email.to_lowercase().replace('.', "_")
}

pub async fn save_pending_registration(
    store: &dyn Store,
    req: SavePendingRequest,
) -> Result<PendingRegistration, ApiError> {
    let key = normalize_email_key(&req.email);
    let reg = PendingRegistration {
        nom: req.nom,
        prenom: req.prenom,
        email: req.email,
        livegame: req.livegame,
        created_at: Utc::now(),
    };

    store.put_pending(&key, &reg).await?;

    let _ = store
        .record_event(
            "registration_submitted",
            "pending_registration",
            Some(key),
            Some(serde_json::json!({ "email": &reg.email })),
        )
        .await;

    Ok(reg)
}

pub async fn get_pending_registration(
    store: &dyn Store,
    email: &str,
) -> Result<Option<PendingRegistration>, ApiError> {
    store.get_pending(&normalize_email_key(email)).await
}

/// Idempotent removal: an absent record and a failed delete are both treated
/// as success so a promotion retry never gets stuck on cleanup.
pub async fn remove_pending_registration(store: &dyn Store, email: &str) {
    let key = normalize_email_key(email);
    if let Err(err) = store.delete_pending(&key).await {
        tracing::warn!("failed to remove pending registration {}: {}", key, err);
    }
}

/// Promote a verified pending registration into a croupier record.
///
/// Returns false when no pending record exists. When a croupier with the same
/// email is already present the promotion is treated as done. In both success
/// branches the pending record is removed only after the croupier write has
/// committed, so a crash in between loses nothing; a retry re-observes the
/// existing croupier and just cleans up.
pub async fn create_croupier_from_pending(
    store: &dyn Store,
    email: &str,
) -> Result<bool, ApiError> {
    let Some(pending) = store.get_pending(&normalize_email_key(email)).await? else {
        return Ok(false);
    };

    let existing = store.find_croupiers_by_email(email).await?;
    if !existing.is_empty() {
        remove_pending_registration(store, email).await;
        return Ok(true);
    }

    let croupier = store
        .insert_croupier(NewCroupier {
            nom: pending.nom,
            prenom: pending.prenom,
            email: pending.email,
            livegame: pending.livegame,
            priorite: DEFAULT_PRIORITE,
        })
        .await?;

    let _ = store
        .record_event(
            "croupier_promoted",
            "croupier",
            Some(croupier.id.to_string()),
            Some(serde_json::json!({ "email": &croupier.email })),
        )
        .await;

    remove_pending_registration(store, email).await;

    Ok(true)
}

pub async fn save_pending(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SavePendingRequest>,
) -> Result<Json<PendingRegistration>, ApiError> {
    let reg = save_pending_registration(state.store.as_ref(), payload).await?;
    Ok(Json(reg))
}

pub async fn get_pending(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Option<PendingRegistration>>, ApiError> {
    let reg = get_pending_registration(state.store.as_ref(), &email).await?;
    Ok(Json(reg))
}

pub async fn remove_pending(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> StatusCode {
    remove_pending_registration(state.store.as_ref(), &email).await;
    StatusCode::NO_CONTENT
}

pub async fn confirm_registration(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConfirmRegistrationRequest>,
) -> Result<Json<ConfirmRegistrationResponse>, ApiError> {
    let promoted = create_croupier_from_pending(state.store.as_ref(), &payload.email).await?;

    let response = if promoted {
        ConfirmRegistrationResponse {
            success: true,
            message: "Croupier record confirmed".to_string(),
        }
    } else {
        ConfirmRegistrationResponse {
            success: false,
            message: "No pending registration for this email".to_string(),
        }
    };

    Ok(Json(response))
}
