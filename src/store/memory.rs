//! In-memory entity store
//!
//! `DashMap`-backed implementation of `EntityStore`. The map's sharded locks
//! provide the per-key critical section: `update_if_present` holds the shard
//! guard for the duration of the mutator, and the mutator is synchronous, so
//! no `await` point can interleave another writer on the same key.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Entity, EntityStore};
use crate::domain::LedgerError;

/// Concurrent in-memory store for one entity type.
#[derive(Debug)]
pub struct MemoryStore<T: Entity> {
    entries: DashMap<Uuid, T>,
}

impl<T: Entity> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemoryStore<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>, LedgerError> {
        Ok(self.entries.get(&id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, entity: T) -> Result<(), LedgerError> {
        match self.entries.entry(entity.id()) {
            Entry::Occupied(occupied) => Err(LedgerError::AlreadyExists(*occupied.key())),
            Entry::Vacant(vacant) => {
                vacant.insert(entity);
                Ok(())
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, LedgerError> {
        Ok(self.entries.remove(&id).is_some())
    }

    async fn update_if_present<F>(&self, id: Uuid, mutate: F) -> Result<Option<T>, LedgerError>
    where
        F: FnOnce(&mut T) -> Result<(), LedgerError> + Send + 'async_trait,
    {
        match self.entries.get_mut(&id) {
            None => Ok(None),
            Some(mut entry) => {
                // Mutate a copy so a failed transition leaves the stored
                // entity exactly as it was.
                let mut next = entry.value().clone();
                mutate(&mut next)?;
                *entry.value_mut() = next.clone();
                Ok(Some(next))
            }
        }
    }
}
