//! Read-only interfaces to the entity store and the viewer
//!
//! The engine never owns entity storage. It reads snapshots through
//! [`EntityAccessor`] and the acting user through [`ViewerSource`].
//! [`InMemoryEntityStore`] is a small reference store used by tests and by
//! callers that hold snapshots in memory.

use std::collections::HashMap;

use crate::content::ContentEntity;
use crate::errors::{EngineError, Result};
use crate::identifiers::ContentKey;
use crate::reveal::RevealFlag;
use crate::session::ViewerSession;
use crate::viewer::Viewer;

/// Keyed lookup of content snapshots
pub trait EntityAccessor {
    /// Latest snapshot for a key, `None` while not loaded
    fn get_entity(&self, key: &ContentKey) -> Option<ContentEntity>;

    /// Reveal state the store holds for a secret-bearing entity
    fn get_reveal_state(&self, key: &ContentKey) -> RevealFlag;
}

/// Source of the current viewer
pub trait ViewerSource {
    /// The acting user
    fn current_viewer(&self) -> Viewer;
}

impl ViewerSource for ViewerSession {
    fn current_viewer(&self) -> Viewer {
        self.viewer()
    }
}

impl<A: EntityAccessor + ?Sized> EntityAccessor for &A {
    fn get_entity(&self, key: &ContentKey) -> Option<ContentEntity> {
        (**self).get_entity(key)
    }

    fn get_reveal_state(&self, key: &ContentKey) -> RevealFlag {
        (**self).get_reveal_state(key)
    }
}

/// In-memory entity store
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityStore {
    entities: HashMap<ContentKey, ContentEntity>,
    reveals: HashMap<ContentKey, RevealFlag>,
}

impl InMemoryEntityStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or wholesale-replace a snapshot
    pub fn upsert(&mut self, entity: ContentEntity) -> Option<ContentEntity> {
        self.entities.insert(entity.key(), entity)
    }

    /// Hard delete
    pub fn remove(&mut self, key: &ContentKey) -> Option<ContentEntity> {
        self.reveals.remove(key);
        self.entities.remove(key)
    }

    /// Soft delete: keep the snapshot but mark it deleted
    pub fn tombstone(&mut self, key: &ContentKey) -> Result<()> {
        let entity = self
            .entities
            .get(key)
            .ok_or_else(|| EngineError::not_found(format!("entity {key}")))?;
        let mut replacement = entity.clone();
        replacement.is_deleted = true;
        self.entities.insert(*key, replacement);
        Ok(())
    }

    /// Store a reveal state for a secret-bearing entity
    pub fn set_reveal_state(&mut self, key: ContentKey, flag: RevealFlag) {
        self.reveals.insert(key, flag);
    }

    /// Load a JSON array of snapshots, returning how many were stored
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let entities: Vec<ContentEntity> = serde_json::from_str(json)?;
        let count = entities.len();
        for entity in entities {
            self.upsert(entity);
        }
        tracing::debug!(count, "loaded entity snapshots");
        Ok(count)
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityAccessor for InMemoryEntityStore {
    fn get_entity(&self, key: &ContentKey) -> Option<ContentEntity> {
        self.entities.get(key).cloned()
    }

    fn get_reveal_state(&self, key: &ContentKey) -> RevealFlag {
        self.reveals.get(key).copied().unwrap_or_default()
    }
}
