//! Document-store access. Four collections (`pending_registrations`,
//! `croupiers`, `evenements`, `postulations`) plus the `system_events` audit
//! trail, reached through exact-match and field-equality queries only.
//!
//! Handlers hold the store as an injected `Arc<dyn Store>`; `PgStore` is the
//! production implementation.

mod postgres;

pub use postgres::PgStore;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    Croupier, Evenement, NewCroupier, PendingRegistration, Postulation, SystemEvent,
};

#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), ApiError>;

    // pending_registrations — keyed by normalized email
    async fn put_pending(&self, key: &str, reg: &PendingRegistration) -> Result<(), ApiError>;
    async fn get_pending(&self, key: &str) -> Result<Option<PendingRegistration>, ApiError>;
    async fn delete_pending(&self, key: &str) -> Result<(), ApiError>;

    // croupiers
    async fn find_croupiers_by_email(&self, email: &str) -> Result<Vec<Croupier>, ApiError>;
    async fn insert_croupier(&self, new: NewCroupier) -> Result<Croupier, ApiError>;
    async fn list_croupiers(&self) -> Result<Vec<Croupier>, ApiError>;

    // evenements — read-only in this service
    async fn list_evenements(&self) -> Result<Vec<Evenement>, ApiError>;

    // postulations
    async fn list_postulations(&self) -> Result<Vec<Postulation>, ApiError>;
    async fn find_postulations(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> Result<Vec<Postulation>, ApiError>;
    async fn insert_postulation(
        &self,
        event_id: Uuid,
        email: &str,
        debut: &str,
        fin: &str,
    ) -> Result<Postulation, ApiError>;
    async fn update_postulation_window(
        &self,
        id: Uuid,
        debut: &str,
        fin: &str,
    ) -> Result<Postulation, ApiError>;

    // system_events — best-effort audit trail
    async fn record_event(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Option<String>,
        data: Option<Value>,
    ) -> Result<(), ApiError>;
    async fn list_system_events(
        &self,
        event_type: Option<String>,
        limit: i64,
    ) -> Result<Vec<SystemEvent>, ApiError>;
}
