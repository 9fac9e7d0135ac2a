use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LifecycleError, Result};
use crate::lifecycle::{Event, LifecycleState, Step};

/// One operator's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: LifecycleState,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: LifecycleState::new(),
        }
    }
}

/// Trait for storing sessions and applying lifecycle events to them.
///
/// `apply` must read, transition and write a session as one step so that
/// two concurrent submissions cannot both leave `Input`. `delete` refuses a
/// session in `Loading` so that the pending outcome has a session to land in.
#[async_trait]
pub trait LifecycleStorage: Send + Sync {
    async fn create(&self) -> Result<Session>;
    async fn get(&self, id: &str) -> Result<Option<Session>>;
    async fn apply(&self, id: &str, event: Event) -> Result<Step>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory implementation of LifecycleStorage. Sessions live as long as
/// the process.
#[derive(Default)]
pub struct InMemoryLifecycleStorage {
    sessions: Arc<DashMap<String, LifecycleState>>,
}

impl InMemoryLifecycleStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl LifecycleStorage for InMemoryLifecycleStorage {
    async fn create(&self) -> Result<Session> {
        let session = Session::new(Uuid::new_v4().to_string());
        self.sessions
            .insert(session.id.clone(), session.state.clone());
        Ok(session)
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|entry| Session {
            id: id.to_string(),
            state: entry.value().clone(),
        }))
    }

    async fn apply(&self, id: &str, event: Event) -> Result<Step> {
        let mut entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| LifecycleError::SessionNotFound(id.to_string()))?;
        let step = entry.apply(event)?;
        *entry = step.state.clone();
        Ok(step)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.sessions.entry(id.to_string()) {
            Entry::Occupied(entry) if entry.get().is_loading() => {
                Err(LifecycleError::InvalidTransition {
                    phase: entry.get().phase.name(),
                    event: "delete",
                })
            }
            Entry::Occupied(entry) => {
                entry.remove();
                Ok(())
            }
            Entry::Vacant(_) => Err(LifecycleError::SessionNotFound(id.to_string())),
        }
    }
}
