//! Error types for refpack
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Nothing in the pickling core recovers from an error locally: every
//! variant below surfaces to the caller.

use crate::types::{EntityId, TypeKey, TypeKeyError};
use std::io;
use thiserror::Error;

/// Result type alias for refpack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for refpack
#[derive(Debug, Error)]
pub enum Error {
    /// An entity's model has no type key in the directory (encode time)
    ///
    /// Only raised when the encoder is configured to reject unresolved
    /// entities; otherwise the entity passes through unchanged.
    #[error("No type key for model '{model}' (entity {id})")]
    UnresolvedTypeKey {
        /// Model name reported by the entity
        model: String,
        /// Entity primary key
        id: EntityId,
    },

    /// A packed reference names a type the directory does not know (decode time)
    #[error("Unknown type key: {0}")]
    UnknownTypeKey(TypeKey),

    /// The referenced record no longer exists in storage
    #[error("Entity not found: {key}{id}")]
    NotFound {
        /// Type key of the missing record
        key: TypeKey,
        /// Primary key of the missing record
        id: EntityId,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Directory service failure
    #[error("Directory error: {0}")]
    Directory(String),

    /// Malformed type key
    #[error("Invalid type key: {0}")]
    InvalidTypeKey(#[from] TypeKeyError),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for a stale reference to a deleted record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
