//! Shared test support: an in-memory `Store` standing in for the document
//! store so the operations can be exercised without PostgreSQL.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use croupier_server::db::Store;
use croupier_server::error::ApiError;
use croupier_server::models::{
    Croupier, Evenement, NewCroupier, PendingRegistration, Postulation, SystemEvent,
};

#[derive(Default)]
pub struct MemStore {
    pub pending: Mutex<HashMap<String, PendingRegistration>>,
    pub croupiers: Mutex<Vec<Croupier>>,
    pub evenements: Mutex<Vec<Evenement>>,
    pub postulations: Mutex<Vec<Postulation>>,
    pub events: Mutex<Vec<SystemEvent>>,
}

impl MemStore {
    pub fn seed_evenement(&self, nom: &str) -> Evenement {
        let ev = Evenement {
            id: Uuid::new_v4(),
            nom: nom.to_string(),
            description: None,
            image_url: None,
            created_at: Utc::now(),
        };
        self.evenements.lock().unwrap().push(ev.clone());
        ev
    }

    pub fn seed_croupier(&self, nom: &str, prenom: &str, email: &str, priorite: i32) -> Croupier {
        let croupier = Croupier {
            id: Uuid::new_v4(),
            nom: nom.to_string(),
            prenom: prenom.to_string(),
            email: email.to_string(),
            livegame: false,
            priorite,
            created_at: Utc::now(),
        };
        self.croupiers.lock().unwrap().push(croupier.clone());
        croupier
    }

    pub fn croupier_count(&self) -> usize {
        self.croupiers.lock().unwrap().len()
    }

    pub fn postulation_count(&self) -> usize {
        self.postulations.lock().unwrap().len()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn put_pending(&self, key: &str, reg: &PendingRegistration) -> Result<(), ApiError> {
        self.pending
            .lock()
            .unwrap()
            .insert(key.to_string(), reg.clone());
        Ok(())
    }

    async fn get_pending(&self, key: &str) -> Result<Option<PendingRegistration>, ApiError> {
        Ok(self.pending.lock().unwrap().get(key).cloned())
    }

    async fn delete_pending(&self, key: &str) -> Result<(), ApiError> {
        self.pending.lock().unwrap().remove(key);
        Ok(())
    }

    async fn find_croupiers_by_email(&self, email: &str) -> Result<Vec<Croupier>, ApiError> {
        Ok(self
            .croupiers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.email == email)
            .cloned()
            .collect())
    }

    async fn insert_croupier(&self, new: NewCroupier) -> Result<Croupier, ApiError> {
        let mut croupiers = self.croupiers.lock().unwrap();

        // Unique email backstop, as in the real schema.
        if let Some(existing) = croupiers.iter().find(|c| c.email == new.email) {
            return Ok(existing.clone());
        }

        let croupier = Croupier {
            id: Uuid::new_v4(),
            nom: new.nom,
            prenom: new.prenom,
            email: new.email,
            livegame: new.livegame,
            priorite: new.priorite,
            created_at: Utc::now(),
        };
        croupiers.push(croupier.clone());
        Ok(croupier)
    }

    async fn list_croupiers(&self) -> Result<Vec<Croupier>, ApiError> {
        Ok(self.croupiers.lock().unwrap().clone())
    }

    async fn list_evenements(&self) -> Result<Vec<Evenement>, ApiError> {
        Ok(self.evenements.lock().unwrap().clone())
    }

    async fn list_postulations(&self) -> Result<Vec<Postulation>, ApiError> {
        Ok(self.postulations.lock().unwrap().clone())
    }

    async fn find_postulations(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> Result<Vec<Postulation>, ApiError> {
        Ok(self
            .postulations
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.event_id == event_id && p.email == email)
            .cloned()
            .collect())
    }

    async fn insert_postulation(
        &self,
        event_id: Uuid,
        email: &str,
        debut: &str,
        fin: &str,
    ) -> Result<Postulation, ApiError> {
        let mut postulations = self.postulations.lock().unwrap();

        // Unique (event_id, email) backstop: a lost race degrades to update.
        if let Some(existing) = postulations
            .iter_mut()
            .find(|p| p.event_id == event_id && p.email == email)
        {
            existing.debut = debut.to_string();
            existing.fin = fin.to_string();
            existing.updated_at = Some(Utc::now());
            return Ok(existing.clone());
        }

        let postulation = Postulation {
            id: Uuid::new_v4(),
            event_id,
            email: email.to_string(),
            debut: debut.to_string(),
            fin: fin.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        postulations.push(postulation.clone());
        Ok(postulation)
    }

    async fn update_postulation_window(
        &self,
        id: Uuid,
        debut: &str,
        fin: &str,
    ) -> Result<Postulation, ApiError> {
        let mut postulations = self.postulations.lock().unwrap();
        let postulation = postulations
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound("postulation not found".to_string()))?;

        postulation.debut = debut.to_string();
        postulation.fin = fin.to_string();
        postulation.updated_at = Some(Utc::now());
        Ok(postulation.clone())
    }

    async fn record_event(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Option<String>,
        data: Option<Value>,
    ) -> Result<(), ApiError> {
        self.events.lock().unwrap().push(SystemEvent {
            id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            entity_type: Some(entity_type.to_string()),
            entity_id,
            data,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_system_events(
        &self,
        event_type: Option<String>,
        limit: i64,
    ) -> Result<Vec<SystemEvent>, ApiError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| match &event_type {
                Some(t) => &e.event_type == t,
                None => true,
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
