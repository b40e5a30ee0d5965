use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Unconfirmed signup, stored at a key derived from the email while the
/// verification mail is in flight. The document key is not part of the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingRegistration {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub livegame: bool,
    pub created_at: DateTime<Utc>,
}

/// Confirmed staff member, eligible for event assignment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Croupier {
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub livegame: bool,
    pub priorite: i32,
    pub created_at: DateTime<Utc>,
}

/// Event record. Read-only here; created and maintained by the event
/// management flow, not this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Evenement {
    pub id: Uuid,
    pub nom: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A croupier's availability window for one event. At most one per
/// (event_id, email) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Postulation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub debut: String,
    pub fin: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SystemEvent {
    pub id: Uuid,
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Registration submission. Only the email is required; missing fields
/// default to empty/false rather than being rejected.
#[derive(Debug, Deserialize)]
pub struct SavePendingRequest {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    pub email: String,
    #[serde(default)]
    pub livegame: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRegistrationRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmRegistrationResponse {
    pub success: bool,
    pub message: String,
}

/// Croupier fields at creation time; id and created_at are store-assigned.
#[derive(Debug, Clone)]
pub struct NewCroupier {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub livegame: bool,
    pub priorite: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertPostulationRequest {
    pub event_id: Uuid,
    pub email: String,
    pub debut: String,
    pub fin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Serialize)]
pub struct UpsertPostulationResponse {
    pub outcome: UpsertOutcome,
    pub postulation: Postulation,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: Option<String>,
}
