//! Entity-reference decoder
//!
//! Inverse of the encoder: every packed reference in a value is replaced by
//! the live entity it names. The directory service is synced once per call,
//! before any reference is resolved.

use crate::config::PickleConfig;
use crate::encoder::Packed;
use crate::format::Format;
use refpack_core::{Error, PackedRef, Result, Value};
use refpack_directory::TypeKeyDirectory;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// Resolves packed references back into live entities
#[derive(Debug, Clone)]
pub struct Decoder {
    directory: Arc<TypeKeyDirectory>,
    format: Format,
}

impl Decoder {
    /// Create a decoder using the default byte format
    pub fn new(directory: Arc<TypeKeyDirectory>) -> Self {
        Self {
            directory,
            format: Format::default(),
        }
    }

    /// Create a decoder from configuration
    pub fn from_config(directory: Arc<TypeKeyDirectory>, config: &PickleConfig) -> Self {
        Self {
            directory,
            format: config.format,
        }
    }

    /// Set the byte format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Current byte format
    pub fn format(&self) -> Format {
        self.format
    }

    /// Replace every packed reference in `value` with its live entity
    ///
    /// A reference with the absent id decodes to `Null`.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if a referenced record no longer exists
    /// - `Error::UnknownTypeKey` if a reference names a type the directory
    ///   does not know
    /// - any error from the directory service sync or directory load
    pub fn decode(&self, value: Value) -> Result<Value> {
        self.directory.service().sync()?;
        self.walk(value)
    }

    /// Deserialize `bytes` and decode the result
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` for malformed bytes, otherwise the
    /// same errors as [`Decoder::decode`].
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Value> {
        let value = self.format.deserialize(bytes)?;
        self.decode(value)
    }

    /// Decode the output of [`Encoder::pack`](crate::Encoder::pack)
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::decode_bytes`].
    pub fn unpack(&self, packed: Packed) -> Result<Value> {
        match packed {
            Packed::Bytes(bytes) => self.decode_bytes(&bytes),
            Packed::Value(value) => self.decode(value),
        }
    }

    fn walk(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::String(_)
            | Value::Bytes(_) => Ok(value),
            Value::Ref(packed) => self.resolve(&packed),
            Value::Tuple(items) => Ok(Value::Tuple(self.walk_all(items)?)),
            Value::Map(entries) => {
                let mut out = BTreeMap::new();
                for (key, item) in entries {
                    out.insert(key, self.walk(item)?);
                }
                Ok(Value::Map(out))
            }
            Value::List(items) => Ok(Value::List(self.walk_all(items)?)),
            Value::Entity(_) => Ok(value),
        }
    }

    fn walk_all(&self, items: Vec<Value>) -> Result<Vec<Value>> {
        items.into_iter().map(|item| self.walk(item)).collect()
    }

    fn resolve(&self, packed: &PackedRef) -> Result<Value> {
        if packed.is_absent() {
            return Ok(Value::Null);
        }

        let model = self
            .directory
            .model_for_key(&packed.type_key)?
            .ok_or_else(|| Error::UnknownTypeKey(packed.type_key.clone()))?;
        let record = model.get(packed.id)?;
        trace!(%packed, "Resolved entity reference");

        Ok(Value::Entity(record.facade().unwrap_or(record)))
    }
}
