use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    Croupier, Evenement, NewCroupier, PendingRegistration, Postulation, SystemEvent,
};

use super::Store;

/// PostgreSQL-backed store. Schema is loaded from init.sql at database
/// provisioning time, not by this service.
#[derive(Clone)]
pub struct PgStore {
    pool: sqlx::PgPool,
}

impl PgStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn put_pending(&self, key: &str, reg: &PendingRegistration) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO pending_registrations (key, nom, prenom, email, livegame, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (key) DO UPDATE SET
                nom = EXCLUDED.nom,
                prenom = EXCLUDED.prenom,
                email = EXCLUDED.email,
                livegame = EXCLUDED.livegame,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(key)
        .bind(&reg.nom)
        .bind(&reg.prenom)
        .bind(&reg.email)
        .bind(reg.livegame)
        .bind(reg.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_pending(&self, key: &str) -> Result<Option<PendingRegistration>, ApiError> {
        let reg = sqlx::query_as::<_, PendingRegistration>(
            "SELECT * FROM pending_registrations WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reg)
    }

    async fn delete_pending(&self, key: &str) -> Result<(), ApiError> {
        // Deleting an absent key affects zero rows and is still a success.
        sqlx::query("DELETE FROM pending_registrations WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_croupiers_by_email(&self, email: &str) -> Result<Vec<Croupier>, ApiError> {
        let croupiers =
            sqlx::query_as::<_, Croupier>("SELECT * FROM croupiers WHERE email = $1")
                .bind(email)
                .fetch_all(&self.pool)
                .await?;

        Ok(croupiers)
    }

    async fn insert_croupier(&self, new: NewCroupier) -> Result<Croupier, ApiError> {
        // The UNIQUE index on email is the backstop for two promotions racing
        // past the existence check; the loser re-reads the surviving row.
        let inserted = sqlx::query_as::<_, Croupier>(
            r#"
            INSERT INTO croupiers (nom, prenom, email, livegame, priorite)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&new.nom)
        .bind(&new.prenom)
        .bind(&new.email)
        .bind(new.livegame)
        .bind(new.priorite)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(croupier) => Ok(croupier),
            None => {
                let existing =
                    sqlx::query_as::<_, Croupier>("SELECT * FROM croupiers WHERE email = $1")
                        .bind(&new.email)
                        .fetch_one(&self.pool)
                        .await?;
                Ok(existing)
            }
        }
    }

    async fn list_croupiers(&self) -> Result<Vec<Croupier>, ApiError> {
        let croupiers =
            sqlx::query_as::<_, Croupier>("SELECT * FROM croupiers ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(croupiers)
    }

    async fn list_evenements(&self) -> Result<Vec<Evenement>, ApiError> {
        let evenements =
            sqlx::query_as::<_, Evenement>("SELECT * FROM evenements ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(evenements)
    }

    async fn list_postulations(&self) -> Result<Vec<Postulation>, ApiError> {
        let postulations =
            sqlx::query_as::<_, Postulation>("SELECT * FROM postulations ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        Ok(postulations)
    }

    async fn find_postulations(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> Result<Vec<Postulation>, ApiError> {
        let postulations = sqlx::query_as::<_, Postulation>(
            "SELECT * FROM postulations WHERE event_id = $1 AND email = $2",
        )
        .bind(event_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(postulations)
    }

    async fn insert_postulation(
        &self,
        event_id: Uuid,
        email: &str,
        debut: &str,
        fin: &str,
    ) -> Result<Postulation, ApiError> {
        // Lost race on (event_id, email) degrades to the update branch
        // instead of leaving a duplicate application.
        let postulation = sqlx::query_as::<_, Postulation>(
            r#"
            INSERT INTO postulations (event_id, email, debut, fin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_id, email) DO UPDATE SET
                debut = EXCLUDED.debut,
                fin = EXCLUDED.fin,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(email)
        .bind(debut)
        .bind(fin)
        .fetch_one(&self.pool)
        .await?;

        Ok(postulation)
    }

    async fn update_postulation_window(
        &self,
        id: Uuid,
        debut: &str,
        fin: &str,
    ) -> Result<Postulation, ApiError> {
        let postulation = sqlx::query_as::<_, Postulation>(
            r#"
            UPDATE postulations
            SET debut = $2, fin = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(debut)
        .bind(fin)
        .fetch_one(&self.pool)
        .await?;

        Ok(postulation)
    }

    async fn record_event(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Option<String>,
        data: Option<Value>,
    ) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO system_events (event_type, entity_type, entity_id, data) VALUES ($1, $2, $3, $4)",
        )
        .bind(event_type)
        .bind(entity_type)
        .bind(entity_id)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_system_events(
        &self,
        event_type: Option<String>,
        limit: i64,
    ) -> Result<Vec<SystemEvent>, ApiError> {
        let events = if let Some(event_type) = event_type {
            sqlx::query_as::<_, SystemEvent>(
                "SELECT * FROM system_events WHERE event_type = $1 ORDER BY created_at DESC LIMIT $2",
            )
            .bind(event_type)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, SystemEvent>(
                "SELECT * FROM system_events ORDER BY created_at DESC LIMIT $1",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        }?;

        Ok(events)
    }
}
