//! Packed entity references
//!
//! A `PackedRef` is the portable stand-in for a live entity: the entity's
//! type key plus its numeric identity. On the wire it is the 3-tuple
//! `("__packed_dbobj__", type_key, id)`.
//!
//! Inside a `Value` a packed reference always travels in its own
//! `Value::Ref` variant, so an ordinary user tuple that happens to start
//! with the sentinel string is never mistaken for one.

use crate::types::{EntityId, TypeKey};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sentinel opening every packed reference on the wire
pub const PACKED_SENTINEL: &str = "__packed_dbobj__";

/// Portable reference to a persisted entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackedRef {
    /// Natural key of the entity's concrete type
    pub type_key: TypeKey,
    /// Primary key of the entity
    pub id: EntityId,
}

impl PackedRef {
    /// Create a packed reference
    pub fn new(type_key: TypeKey, id: EntityId) -> Self {
        Self { type_key, id }
    }

    /// True when the reference carries no identity and decodes to null
    pub fn is_absent(&self) -> bool {
        self.id.is_absent()
    }
}

impl fmt::Display for PackedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_key, self.id)
    }
}

impl Serialize for PackedRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(PACKED_SENTINEL)?;
        tuple.serialize_element(&self.type_key)?;
        tuple.serialize_element(&self.id)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for PackedRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(3, PackedRefVisitor)
    }
}

struct PackedRefVisitor;

impl<'de> Visitor<'de> for PackedRefVisitor {
    type Value = PackedRef;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a ({:?}, type_key, id) tuple", PACKED_SENTINEL)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PackedRef, A::Error> {
        let sentinel: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        if sentinel != PACKED_SENTINEL {
            return Err(de::Error::invalid_value(
                de::Unexpected::Str(&sentinel),
                &self,
            ));
        }
        let type_key: TypeKey = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let id: EntityId = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        Ok(PackedRef { type_key, id })
    }
}
