//! Core types and traits for refpack
//!
//! This crate defines the foundational types used throughout the system:
//! - EntityId / TypeKey: the portable address of a persisted entity
//! - PackedRef: the reference token stored in place of a live entity
//! - Value: nested data that may hold live entities or packed references
//! - Error: Error type hierarchy
//! - Traits: the storage seam (Entity, EntityModel, DirectoryService)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod packed;
pub mod traits;
pub mod types;
pub mod value;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use packed::{PackedRef, PACKED_SENTINEL};
pub use traits::{resolve_record, same_entity, DirectoryService, Entity, EntityHandle, EntityModel};
pub use types::{parse_dbref, EntityId, TypeKey, TypeKeyError};
pub use value::{MapKey, Value};
