//! Entity Store
//!
//! Key-addressed persistence capability for ledger entities. The atomic
//! `update_if_present` primitive is what every higher component uses to avoid
//! lost updates: read the current value, apply a pure fallible transformation,
//! write the result back as one indivisible step relative to other operations
//! on the same key. Cross-key atomicity is not provided here; the settlement
//! path composes it explicitly.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::LedgerError;

pub mod memory;

pub use memory::MemoryStore;

/// An entity addressable by its id.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

impl Entity for crate::domain::User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for crate::domain::Tournament {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Per-key atomic storage for one entity type.
///
/// Absence is expressed as `Ok(None)` / `Ok(false)` rather than an error so
/// callers can attach the entity-specific not-found variant themselves.
/// Implementations signal infrastructure failure as
/// `LedgerError::StoreUnavailable`.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Fetch a snapshot of the entity, if stored.
    async fn get(&self, id: Uuid) -> Result<Option<T>, LedgerError>;

    /// Insert a new entity. Fails `AlreadyExists` if the id is taken.
    async fn put(&self, entity: T) -> Result<(), LedgerError>;

    /// Remove the entity. Returns whether it was present.
    async fn delete(&self, id: Uuid) -> Result<bool, LedgerError>;

    /// Atomically read, transform, and write back the entity under `id`.
    ///
    /// If the mutator fails, the stored entity is left untouched and the
    /// error is surfaced unchanged. Returns the updated entity, or `None`
    /// if the key is absent.
    async fn update_if_present<F>(&self, id: Uuid, mutate: F) -> Result<Option<T>, LedgerError>
    where
        F: FnOnce(&mut T) -> Result<(), LedgerError> + Send + 'async_trait;
}
