//! Capability traits at the storage seam
//!
//! The pickling core never talks to a database directly. It sees three
//! collaborators:
//! - `Entity`: a live, identity-bearing object (possibly a proxy around
//!   the persisted record)
//! - `EntityModel`: one concrete entity type, able to fetch its records
//! - `DirectoryService`: the catalogue of every known model
//!
//! A value is treated as an entity reference only because it implements
//! `Entity`; nothing is inferred from the shape of an object.

use crate::error::Result;
use crate::types::{EntityId, TypeKey};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a live entity
pub type EntityHandle = Arc<dyn Entity>;

/// A live object backed by a persisted record
///
/// Thread safety: entities are shared between the caller and decoded
/// values, so implementations must be Send + Sync.
pub trait Entity: fmt::Debug + Send + Sync + 'static {
    /// Primary key of the persisted record
    fn id(&self) -> EntityId;

    /// Name of the concrete model this entity belongs to
    ///
    /// For a proxy this is the proxy's own model; the encoder unwraps
    /// proxies through [`Entity::record`] before looking the model up.
    fn model(&self) -> &str;

    /// The persisted record behind a proxy
    ///
    /// Returns None when `self` already is the record.
    fn record(&self) -> Option<EntityHandle> {
        None
    }

    /// The outward-facing representation handed back to game code
    ///
    /// Returns None when the record has no separate facade.
    fn facade(&self) -> Option<EntityHandle> {
        None
    }

    /// Downcast support
    fn as_any(&self) -> &dyn Any;
}

/// The persisted record behind `entity`, or the entity itself
pub fn resolve_record(entity: &EntityHandle) -> EntityHandle {
    entity.record().unwrap_or_else(|| Arc::clone(entity))
}

/// True when both handles denote the same persisted record
pub fn same_entity(a: &EntityHandle, b: &EntityHandle) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    let a = resolve_record(a);
    let b = resolve_record(b);
    a.model() == b.model() && a.id() == b.id()
}

/// One concrete entity type known to the directory
pub trait EntityModel: Send + Sync {
    /// Model name, matching [`Entity::model`] of its records
    fn name(&self) -> &str;

    /// Stable natural key of this model
    fn type_key(&self) -> &TypeKey;

    /// Fetch a record by primary key
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no record with this id exists.
    fn get(&self, id: EntityId) -> Result<EntityHandle>;
}

impl fmt::Debug for dyn EntityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityModel")
            .field("name", &self.name())
            .field("type_key", self.type_key())
            .finish()
    }
}

/// Catalogue of every model the backing store knows about
pub trait DirectoryService: Send + Sync {
    /// Enumerate all known models
    ///
    /// # Errors
    ///
    /// Returns `Error::Directory` if the catalogue cannot be read.
    fn models(&self) -> Result<Vec<Arc<dyn EntityModel>>>;

    /// Bring the store to a committed, consistent state
    ///
    /// Called by the decoder before it resolves any reference, so records
    /// written by other processes are visible. This is a point-in-time
    /// barrier, not a lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be synchronized.
    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
