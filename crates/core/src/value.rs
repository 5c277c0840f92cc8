//! Value types for refpack
//!
//! This module defines:
//! - Value: the nested structure handed to the encoder and returned by the decoder
//! - MapKey: the scalar keys a `Value::Map` may use
//!
//! ## Shapes
//!
//! - Scalars: Null, Bool, Int, Float, String, Bytes
//! - Containers: List (ordered sequence), Tuple (fixed), Map (key order irrelevant)
//! - Ref: a packed entity reference
//! - Entity: a live entity handle
//!
//! `Entity` is the only shape that cannot be written to bytes. The encoder
//! replaces it with `Ref`; the decoder turns `Ref` back into `Entity`.
//!
//! ## Equality
//!
//! - Different variants are NEVER equal: `Int(1) != Float(1.0)`,
//!   `Tuple([..]) != List([..])`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Two `Entity` values are equal when they denote the same persisted record

use crate::packed::PackedRef;
use crate::traits::{same_entity, EntityHandle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of a `Value::Map` entry
///
/// Keys are never rewritten by the encoder or decoder, so they are limited
/// to hashable scalars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MapKey {
    /// Boolean key
    Bool(bool),
    /// Integer key
    Int(i64),
    /// String key
    String(String),
}

impl From<bool> for MapKey {
    fn from(b: bool) -> Self {
        MapKey::Bool(b)
    }
}

impl From<i64> for MapKey {
    fn from(i: i64) -> Self {
        MapKey::Int(i)
    }
}

impl From<i32> for MapKey {
    fn from(i: i32) -> Self {
        MapKey::Int(i as i64)
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::String(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::String(s)
    }
}

/// Nested data that may hold live entity references
///
/// `Entity` is declared last and skipped by serde; keep new variants above
/// it so variant indices in stored bytes stay put.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence
    List(Vec<Value>),
    /// Fixed tuple
    Tuple(Vec<Value>),
    /// Mapping; entry order carries no meaning
    Map(BTreeMap<MapKey, Value>),
    /// Packed entity reference
    Ref(PackedRef),
    /// Live entity
    #[serde(skip)]
    Entity(EntityHandle),
}

// Custom PartialEq: IEEE-754 floats and identity-based entity equality
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a == b,
            (Value::Entity(a), Value::Entity(b)) => same_entity(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Build a tuple from its elements
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// Build a list from its elements
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Build a map from key/value pairs
    pub fn map<K: Into<MapKey>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Map(_) => "Map",
            Value::Ref(_) => "Ref",
            Value::Entity(_) => "Entity",
        }
    }

    /// True for shapes with no children and no entity meaning
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::Float(_)
                | Value::String(_)
                | Value::Bytes(_)
        )
    }

    /// Truthiness
    ///
    /// Null, false, zero, and empty strings/bytes/containers are falsy.
    /// References and entities are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Ref(_) | Value::Entity(_) => true,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True if a live entity appears anywhere in this value
    pub fn contains_entities(&self) -> bool {
        match self {
            Value::Entity(_) => true,
            Value::List(items) | Value::Tuple(items) => items.iter().any(Value::contains_entities),
            Value::Map(entries) => entries.values().any(Value::contains_entities),
            _ => false,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the elements if this is a List value
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the elements if this is a Tuple value
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entries if this is a Map value
    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get the packed reference if this is a Ref value
    pub fn as_packed(&self) -> Option<&PackedRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Get the handle if this is an Entity value
    pub fn as_entity(&self) -> Option<&EntityHandle> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<PackedRef> for Value {
    fn from(r: PackedRef) -> Self {
        Value::Ref(r)
    }
}

impl From<EntityHandle> for Value {
    fn from(e: EntityHandle) -> Self {
        Value::Entity(e)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
