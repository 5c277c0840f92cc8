//! In-memory directory service
//!
//! `MemoryDirectory` is a complete [`DirectoryService`] that keeps every
//! record in process memory. It backs tests and single-process tools that
//! do not have a database behind them.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use refpack_core::{Entity, EntityModel, TypeKey};
//! use refpack_directory::{MemoryDirectory, MemoryModel, MemoryRecord};
//!
//! let directory = MemoryDirectory::new();
//! let objects = directory.register(MemoryModel::new(
//!     "objectdb",
//!     TypeKey::new("objects.objectdb").unwrap(),
//! ));
//!
//! let id = objects.allocate_id();
//! objects.insert(Arc::new(MemoryRecord::new(id, "objectdb", "a rusty key"))).unwrap();
//! assert_eq!(objects.get(id).unwrap().id(), id);
//! ```

use parking_lot::RwLock;
use refpack_core::{
    DirectoryService, Entity, EntityHandle, EntityId, EntityModel, Error, Result, TypeKey,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Plain named record for in-memory models
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecord {
    id: EntityId,
    model: String,
    name: String,
}

impl MemoryRecord {
    /// Create a record
    pub fn new(id: EntityId, model: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            model: model.into(),
            name: name.into(),
        }
    }

    /// Display name of the record
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for MemoryRecord {
    fn id(&self) -> EntityId {
        self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One model whose records live in a hash map
pub struct MemoryModel {
    name: String,
    type_key: TypeKey,
    records: RwLock<HashMap<EntityId, EntityHandle>>,
    next_id: AtomicU64,
}

impl MemoryModel {
    /// Create an empty model
    pub fn new(name: impl Into<String>, type_key: TypeKey) -> Self {
        Self {
            name: name.into(),
            type_key,
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Reserve a fresh primary key (starting at 1, never reused)
    pub fn allocate_id(&self) -> EntityId {
        EntityId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Store a record under its own id, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns `Error::Directory` if the record has the absent id or
    /// belongs to another model.
    pub fn insert(&self, entity: EntityHandle) -> Result<()> {
        let id = entity.id();
        if id.is_absent() {
            return Err(Error::Directory(format!(
                "cannot store a {} record without an id",
                self.name
            )));
        }
        if entity.model() != self.name {
            return Err(Error::Directory(format!(
                "record of model '{}' does not belong to model '{}'",
                entity.model(),
                self.name
            )));
        }
        // Keep allocate_id ahead of explicitly chosen ids
        self.next_id.fetch_max(id.as_u64() + 1, Ordering::Relaxed);
        self.records.write().insert(id, entity);
        Ok(())
    }

    /// Delete a record, returning it if it existed
    pub fn remove(&self, id: EntityId) -> Option<EntityHandle> {
        let removed = self.records.write().remove(&id);
        if removed.is_some() {
            debug!(model = %self.name, %id, "Removed record");
        }
        removed
    }

    /// True if a record with this id is stored
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.read().contains_key(&id)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when no records are stored
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl EntityModel for MemoryModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    fn get(&self, id: EntityId) -> Result<EntityHandle> {
        self.records
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                key: self.type_key.clone(),
                id,
            })
    }
}

/// Directory service over in-memory models
///
/// Counts enumerations and consistency barriers so callers can observe how
/// often the pickling layer reaches the "database".
#[derive(Default)]
pub struct MemoryDirectory {
    models: RwLock<Vec<Arc<MemoryModel>>>,
    enumerations: AtomicU64,
    syncs: AtomicU64,
}

impl MemoryDirectory {
    /// Create a directory with no models
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model and return a handle to it
    ///
    /// Duplicate names or keys are accepted here and reported by the
    /// type-key directory when it loads.
    pub fn register(&self, model: MemoryModel) -> Arc<MemoryModel> {
        let model = Arc::new(model);
        self.models.write().push(Arc::clone(&model));
        model
    }

    /// Look up a registered model by name
    pub fn model(&self, name: &str) -> Option<Arc<MemoryModel>> {
        self.models
            .read()
            .iter()
            .find(|m| m.name == name)
            .cloned()
    }

    /// How many times the model list has been enumerated
    pub fn enumeration_count(&self) -> u64 {
        self.enumerations.load(Ordering::Relaxed)
    }

    /// How many consistency barriers have been requested
    pub fn sync_count(&self) -> u64 {
        self.syncs.load(Ordering::Relaxed)
    }
}

impl DirectoryService for MemoryDirectory {
    fn models(&self) -> Result<Vec<Arc<dyn EntityModel>>> {
        self.enumerations.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .models
            .read()
            .iter()
            .map(|m| Arc::clone(m) as Arc<dyn EntityModel>)
            .collect())
    }

    fn sync(&self) -> Result<()> {
        // Nothing is buffered in memory; just record the barrier
        self.syncs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
