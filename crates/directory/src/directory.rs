//! Type-key directory
//!
//! Bidirectional cache between model names and their stable type keys,
//! built from a [`DirectoryService`] on first use.
//!
//! ## Loading
//!
//! The index is loaded lazily under a write lock with a double check, so
//! concurrent first use enumerates the service exactly once and every later
//! caller reads a fully built index. A failed load leaves the directory
//! unloaded; the next lookup retries.
//!
//! ## Invalidation
//!
//! There is no eviction. Call [`TypeKeyDirectory::refresh`] after the set of
//! models changes at runtime.

use parking_lot::RwLock;
use refpack_core::{DirectoryService, EntityModel, Error, Result, TypeKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable snapshot of the directory contents
struct DirectoryIndex {
    /// Model name -> type key (encode side)
    keys_by_model: HashMap<String, TypeKey>,
    /// Type key -> model (decode side)
    models_by_key: HashMap<TypeKey, Arc<dyn EntityModel>>,
}

impl DirectoryIndex {
    fn build(service: &dyn DirectoryService) -> Result<Self> {
        let models = service.models()?;
        let mut keys_by_model = HashMap::with_capacity(models.len());
        let mut models_by_key: HashMap<TypeKey, Arc<dyn EntityModel>> =
            HashMap::with_capacity(models.len());

        for model in models {
            let name = model.name().to_string();
            let key = model.type_key().clone();

            if keys_by_model.contains_key(&name) {
                return Err(Error::Directory(format!(
                    "model '{}' is registered more than once",
                    name
                )));
            }
            if models_by_key.contains_key(&key) {
                return Err(Error::Directory(format!(
                    "type key '{}' is claimed by more than one model",
                    key
                )));
            }

            keys_by_model.insert(name, key.clone());
            models_by_key.insert(key, model);
        }

        Ok(Self {
            keys_by_model,
            models_by_key,
        })
    }

    fn len(&self) -> usize {
        self.models_by_key.len()
    }
}

/// Bidirectional model-name / type-key cache
///
/// Thread safety: Send + Sync. Share one instance (usually in an `Arc`)
/// between every encoder and decoder of a process.
pub struct TypeKeyDirectory {
    service: Arc<dyn DirectoryService>,
    index: RwLock<Option<Arc<DirectoryIndex>>>,
}

impl TypeKeyDirectory {
    /// Create an unloaded directory over `service`
    pub fn new(service: Arc<dyn DirectoryService>) -> Self {
        Self {
            service,
            index: RwLock::new(None),
        }
    }

    /// The directory service this cache reads from
    pub fn service(&self) -> &Arc<dyn DirectoryService> {
        &self.service
    }

    fn index(&self) -> Result<Arc<DirectoryIndex>> {
        if let Some(index) = self.index.read().as_ref() {
            return Ok(Arc::clone(index));
        }

        let mut slot = self.index.write();
        // Another caller may have loaded it while we waited for the lock
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(DirectoryIndex::build(self.service.as_ref())?);
        info!(models = index.len(), "Loaded type-key directory");
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Type key for a model name (type_to_key)
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory has to be loaded and loading fails.
    pub fn key_for_model(&self, model: &str) -> Result<Option<TypeKey>> {
        let key = self.index()?.keys_by_model.get(model).cloned();
        if key.is_none() {
            debug!(model, "No type key for model");
        }
        Ok(key)
    }

    /// Model for a type key (key_to_type)
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory has to be loaded and loading fails.
    pub fn model_for_key(&self, key: &TypeKey) -> Result<Option<Arc<dyn EntityModel>>> {
        Ok(self.index()?.models_by_key.get(key).cloned())
    }

    /// Rebuild the index from the service
    ///
    /// On failure the previous index, if any, stays in place.
    ///
    /// # Errors
    ///
    /// Returns the service or consistency error that stopped the rebuild.
    pub fn refresh(&self) -> Result<()> {
        match DirectoryIndex::build(self.service.as_ref()) {
            Ok(index) => {
                info!(models = index.len(), "Refreshed type-key directory");
                *self.index.write() = Some(Arc::new(index));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Type-key directory refresh failed; keeping previous index");
                Err(e)
            }
        }
    }

    /// True once the index has been loaded
    pub fn is_loaded(&self) -> bool {
        self.index.read().is_some()
    }

    /// Number of known models
    ///
    /// # Errors
    ///
    /// Returns an error if loading the directory fails.
    pub fn len(&self) -> Result<usize> {
        Ok(self.index()?.len())
    }

    /// True when the service knows no models
    ///
    /// # Errors
    ///
    /// Returns an error if loading the directory fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// All known type keys, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if loading the directory fails.
    pub fn type_keys(&self) -> Result<Vec<TypeKey>> {
        let mut keys: Vec<TypeKey> = self.index()?.models_by_key.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl fmt::Debug for TypeKeyDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeKeyDirectory")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
