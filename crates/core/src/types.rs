//! Identity types for persisted entities
//!
//! This module defines the two halves of a portable entity address:
//! - EntityId: Numeric primary key of a stored record
//! - TypeKey: Natural key (`app_label.model`) naming the record's concrete type
//!
//! It also provides dbref parsing (`"#42"` → `EntityId(42)`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric primary key of a persisted entity
///
/// The id is stable for the lifetime of the entity's storage record.
/// Id `0` is never assigned by a store and stands for an absent identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// The absent identity
    pub const ABSENT: EntityId = EntityId(0);

    /// Wrap a raw primary key
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw primary key value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// True for the absent identity (`0`)
    pub const fn is_absent(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parse a database reference into an entity id
///
/// Valid forms are `"#N"` and, when `require_hash` is false, a bare `"N"`.
/// Surrounding whitespace is ignored.
///
/// Returns None when the hash is required but missing, when the remainder
/// is not a number, or when the number is below 1.
pub fn parse_dbref(input: &str, require_hash: bool) -> Option<EntityId> {
    let input = input.trim();
    if require_hash && !input.starts_with('#') {
        return None;
    }
    let digits = input.trim_start_matches('#');
    match digits.parse::<u64>() {
        Ok(n) if n >= 1 => Some(EntityId(n)),
        _ => None,
    }
}

/// Separator between app label and model in a natural key
pub const TYPE_KEY_SEPARATOR: char = '.';

/// Stable name of a concrete entity type
///
/// A TypeKey is the natural key `"<app_label>.<model>"`, for example
/// `"objects.objectdb"`. It does not depend on how any process lays out its
/// type registry, so it is safe to persist.
///
/// ## Validation Rules
///
/// - Exactly one `.` separating two non-empty parts
/// - Characters: `[a-z0-9_]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeKey(String);

/// Error when validating a type key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKeyError {
    /// Key is empty
    Empty,
    /// Key has no `app_label.model` separator, or more than one
    MissingSeparator,
    /// App label or model part is empty
    EmptyPart,
    /// Key contains an invalid character
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position of the invalid character
        position: usize,
    },
}

impl fmt::Display for TypeKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKeyError::Empty => write!(f, "type key cannot be empty"),
            TypeKeyError::MissingSeparator => {
                write!(f, "type key must have the form 'app_label.model'")
            }
            TypeKeyError::EmptyPart => write!(f, "type key app label and model must be non-empty"),
            TypeKeyError::InvalidChar { char, position } => write!(
                f,
                "invalid character '{}' at position {} (only lowercase alphanumeric and underscore allowed)",
                char, position
            ),
        }
    }
}

impl std::error::Error for TypeKeyError {}

impl TypeKey {
    /// Create a TypeKey, validating the input
    ///
    /// # Errors
    ///
    /// Returns `TypeKeyError` if the key is malformed.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeKeyError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(TypeKey(key))
    }

    /// Build a TypeKey from its app label and model parts
    ///
    /// # Errors
    ///
    /// Returns `TypeKeyError` if either part is malformed.
    pub fn natural(app_label: &str, model: &str) -> Result<Self, TypeKeyError> {
        Self::new(format!("{}{}{}", app_label, TYPE_KEY_SEPARATOR, model))
    }

    fn validate(key: &str) -> Result<(), TypeKeyError> {
        if key.is_empty() {
            return Err(TypeKeyError::Empty);
        }
        for (position, char) in key.chars().enumerate() {
            let valid = char.is_ascii_lowercase()
                || char.is_ascii_digit()
                || char == '_'
                || char == TYPE_KEY_SEPARATOR;
            if !valid {
                return Err(TypeKeyError::InvalidChar { char, position });
            }
        }
        let mut parts = key.split(TYPE_KEY_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(app), Some(model), None) => {
                if app.is_empty() || model.is_empty() {
                    Err(TypeKeyError::EmptyPart)
                } else {
                    Ok(())
                }
            }
            _ => Err(TypeKeyError::MissingSeparator),
        }
    }

    /// The full natural key
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// App label part (before the separator)
    pub fn app_label(&self) -> &str {
        self.split().0
    }

    /// Model part (after the separator)
    pub fn model(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        self.0
            .split_once(TYPE_KEY_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }
}

impl FromStr for TypeKey {
    type Err = TypeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeKey::new(s)
    }
}

impl TryFrom<String> for TypeKey {
    type Error = TypeKeyError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        TypeKey::new(key)
    }
}

impl From<TypeKey> for String {
    fn from(key: TypeKey) -> Self {
        key.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
