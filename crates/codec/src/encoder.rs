//! Entity-reference encoder
//!
//! Walks a value depth first and replaces every live entity with a packed
//! reference, leaving all other structure as it was:
//!
//! 1. Scalars are returned as-is
//! 2. Tuples are rebuilt element by element
//! 3. Maps are rebuilt value by value; keys are untouched
//! 4. Lists are rebuilt element by element
//! 5. Entities are unwrapped to their persisted record and packed as
//!    `(type_key, id)`; an entity whose model has no type key is handled
//!    by the [`UnresolvedPolicy`]
//!
//! Packed references already present in the input are kept as they are.

use crate::config::{PickleConfig, UnresolvedPolicy};
use crate::format::Format;
use refpack_core::{resolve_record, EntityHandle, Error, PackedRef, Result, Value};
use refpack_directory::TypeKeyDirectory;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of [`Encoder::pack`]
#[derive(Debug, Clone, PartialEq)]
pub enum Packed {
    /// Serialized form
    Bytes(Vec<u8>),
    /// Encoded structure, not serialized
    Value(Value),
}

impl Packed {
    /// The bytes, if this pickle was serialized
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Packed::Bytes(b) => Some(b),
            Packed::Value(_) => None,
        }
    }

    /// The structure, if this pickle was left unserialized
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Packed::Bytes(_) => None,
            Packed::Value(v) => Some(v),
        }
    }
}

/// Replaces live entities with packed references
#[derive(Debug, Clone)]
pub struct Encoder {
    directory: Arc<TypeKeyDirectory>,
    policy: UnresolvedPolicy,
    format: Format,
}

impl Encoder {
    /// Create an encoder with the default policy and format
    pub fn new(directory: Arc<TypeKeyDirectory>) -> Self {
        Self {
            directory,
            policy: UnresolvedPolicy::default(),
            format: Format::default(),
        }
    }

    /// Create an encoder from configuration
    pub fn from_config(directory: Arc<TypeKeyDirectory>, config: &PickleConfig) -> Self {
        Self {
            directory,
            policy: config.on_unresolved,
            format: config.format,
        }
    }

    /// Set the unresolved-entity policy
    pub fn with_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the byte format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Current unresolved-entity policy
    pub fn policy(&self) -> UnresolvedPolicy {
        self.policy
    }

    /// Current byte format
    pub fn format(&self) -> Format {
        self.format
    }

    /// Replace every entity in `value` with a packed reference
    ///
    /// # Errors
    ///
    /// Returns `Error::UnresolvedTypeKey` under `UnresolvedPolicy::Error`,
    /// or a directory error if the type-key directory cannot be loaded.
    pub fn encode(&self, value: &Value) -> Result<Value> {
        self.walk(value)
    }

    /// Encode and serialize `value`
    ///
    /// # Errors
    ///
    /// Returns encode errors, or `Error::Serialization` if an unresolved
    /// entity was passed through and cannot be written.
    pub fn encode_to_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        let encoded = self.walk(value)?;
        self.format.serialize(&encoded)
    }

    /// Encode `value` and optionally serialize it
    ///
    /// With `serialize` set the bytes are returned, except when
    /// `allow_empty` is false and the encoded value is empty: `Null` or an
    /// empty string, byte string or container. Then the structure is
    /// returned unserialized. `false`, `0` and `0.0` always serialize.
    ///
    /// # Errors
    ///
    /// Same as [`Encoder::encode_to_bytes`].
    pub fn pack(&self, value: &Value, serialize: bool, allow_empty: bool) -> Result<Packed> {
        let encoded = self.walk(value)?;
        let skip_empty = !allow_empty && is_empty(&encoded);
        if !serialize || skip_empty {
            return Ok(Packed::Value(encoded));
        }
        Ok(Packed::Bytes(self.format.serialize(&encoded)?))
    }

    fn walk(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::String(_)
            | Value::Bytes(_) => Ok(value.clone()),
            Value::Tuple(items) => Ok(Value::Tuple(self.walk_all(items)?)),
            Value::Map(entries) => {
                let mut out = BTreeMap::new();
                for (key, item) in entries {
                    out.insert(key.clone(), self.walk(item)?);
                }
                Ok(Value::Map(out))
            }
            Value::List(items) => Ok(Value::List(self.walk_all(items)?)),
            Value::Ref(_) => Ok(value.clone()),
            Value::Entity(entity) => self.pack_entity(entity),
        }
    }

    fn walk_all(&self, items: &[Value]) -> Result<Vec<Value>> {
        items.iter().map(|item| self.walk(item)).collect()
    }

    fn pack_entity(&self, entity: &EntityHandle) -> Result<Value> {
        let record = resolve_record(entity);
        let model = record.model();
        let id = record.id();

        match self.directory.key_for_model(model)? {
            Some(type_key) => {
                debug!(%type_key, %id, "Packed entity reference");
                Ok(Value::Ref(PackedRef::new(type_key, id)))
            }
            None => match self.policy {
                UnresolvedPolicy::PassThrough => {
                    warn!(model, %id, "Entity model has no type key; left unpacked");
                    Ok(Value::Entity(Arc::clone(entity)))
                }
                UnresolvedPolicy::Error => Err(Error::UnresolvedTypeKey {
                    model: model.to_string(),
                    id,
                }),
            },
        }
    }
}

/// Falsy and not equal to `false`; falsy bools and numbers all compare equal to it
fn is_empty(value: &Value) -> bool {
    !value.is_truthy() && !matches!(value, Value::Bool(_) | Value::Int(_) | Value::Float(_))
}
