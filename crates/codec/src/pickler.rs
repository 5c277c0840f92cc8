//! Pickler facade
//!
//! Pairs an [`Encoder`] and a [`Decoder`] that share one type-key directory
//! and one configuration. This is the entry point most callers want:
//!
//! ```
//! use std::sync::Arc;
//! use refpack_codec::Pickler;
//! use refpack_core::{EntityHandle, TypeKey, Value};
//! use refpack_directory::{MemoryDirectory, MemoryModel, MemoryRecord};
//!
//! let service = Arc::new(MemoryDirectory::new());
//! let objects = service.register(MemoryModel::new(
//!     "objectdb",
//!     TypeKey::new("objects.objectdb").unwrap(),
//! ));
//! let id = objects.allocate_id();
//! let lamp: EntityHandle = Arc::new(MemoryRecord::new(id, "objectdb", "lamp"));
//! objects.insert(lamp.clone()).unwrap();
//!
//! let pickler = Pickler::from_service(service);
//! let bytes = pickler.dumps(&Value::list([Value::Entity(lamp.clone()), Value::Int(3)])).unwrap();
//! let restored = pickler.loads(&bytes).unwrap();
//! assert_eq!(restored, Value::list([Value::Entity(lamp), Value::Int(3)]));
//! ```

use crate::config::PickleConfig;
use crate::decoder::Decoder;
use crate::encoder::{Encoder, Packed};
use refpack_core::{DirectoryService, Result, Value};
use refpack_directory::TypeKeyDirectory;
use std::sync::Arc;

/// Encoder and decoder over a shared directory
#[derive(Debug, Clone)]
pub struct Pickler {
    directory: Arc<TypeKeyDirectory>,
    config: PickleConfig,
    encoder: Encoder,
    decoder: Decoder,
}

impl Pickler {
    /// Create a pickler with the default configuration
    pub fn new(directory: Arc<TypeKeyDirectory>) -> Self {
        Self::with_config(directory, PickleConfig::default())
    }

    /// Create a pickler with an explicit configuration
    pub fn with_config(directory: Arc<TypeKeyDirectory>, config: PickleConfig) -> Self {
        let encoder = Encoder::from_config(Arc::clone(&directory), &config);
        let decoder = Decoder::from_config(Arc::clone(&directory), &config);
        Self {
            directory,
            config,
            encoder,
            decoder,
        }
    }

    /// Create a pickler with its own directory over `service`
    pub fn from_service(service: Arc<dyn DirectoryService>) -> Self {
        Self::new(Arc::new(TypeKeyDirectory::new(service)))
    }

    /// Pack entities in `value`, serializing when `do_pickle` is set
    ///
    /// With `allow_empty` false an empty result is returned unserialized;
    /// see [`Encoder::pack`].
    ///
    /// # Errors
    ///
    /// Returns encode or serialization errors.
    pub fn to_pickle(&self, value: &Value, do_pickle: bool, allow_empty: bool) -> Result<Packed> {
        self.encoder.pack(value, do_pickle, allow_empty)
    }

    /// Restore entities in a pickle produced by [`Pickler::to_pickle`]
    ///
    /// Bytes are deserialized first; an unserialized pickle is decoded
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns deserialization or decode errors.
    pub fn from_pickle(&self, packed: Packed) -> Result<Value> {
        self.decoder.unpack(packed)
    }

    /// Encode and serialize `value` using the configured empty rule
    ///
    /// # Errors
    ///
    /// Returns encode or serialization errors.
    pub fn pickle(&self, value: &Value) -> Result<Packed> {
        self.to_pickle(value, true, self.config.allow_empty)
    }

    /// Encode and serialize `value`, always producing bytes
    ///
    /// # Errors
    ///
    /// Returns encode or serialization errors.
    pub fn dumps(&self, value: &Value) -> Result<Vec<u8>> {
        self.encoder.encode_to_bytes(value)
    }

    /// Deserialize and decode bytes from [`Pickler::dumps`]
    ///
    /// # Errors
    ///
    /// Returns deserialization or decode errors.
    pub fn loads(&self, bytes: &[u8]) -> Result<Value> {
        self.decoder.decode_bytes(bytes)
    }

    /// The shared type-key directory
    pub fn directory(&self) -> &Arc<TypeKeyDirectory> {
        &self.directory
    }

    /// Active configuration
    pub fn config(&self) -> &PickleConfig {
        &self.config
    }

    /// The encoder half
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The decoder half
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }
}
