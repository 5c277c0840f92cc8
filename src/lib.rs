//! refpack - Reference-safe pickling of game data that holds live entities
//!
//! Nested values (lists, tuples, maps, scalars) often carry references to
//! live database entities. Those cannot be written to bytes as they are:
//! refpack replaces each one with a packed `(type_key, id)` reference on the
//! way out and resolves it back to the live entity on the way in.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use refpack::{EntityHandle, MemoryDirectory, MemoryModel, MemoryRecord, Pickler, TypeKey, Value};
//!
//! let service = Arc::new(MemoryDirectory::new());
//! let objects = service.register(MemoryModel::new(
//!     "objectdb",
//!     TypeKey::new("objects.objectdb").unwrap(),
//! ));
//! let sword: EntityHandle = Arc::new(MemoryRecord::new(objects.allocate_id(), "objectdb", "sword"));
//! objects.insert(sword.clone()).unwrap();
//!
//! let pickler = Pickler::from_service(service);
//! let stored = Value::map([("wielding", Value::Entity(sword.clone()))]);
//!
//! let bytes = pickler.dumps(&stored).unwrap();
//! assert_eq!(pickler.loads(&bytes).unwrap(), stored);
//! ```
//!
//! # Architecture
//!
//! - `refpack-core`: values, ids, type keys, the reference token and the
//!   storage traits (`Entity`, `EntityModel`, `DirectoryService`)
//! - `refpack-directory`: the lazily loaded type-key directory and an
//!   in-memory directory service
//! - `refpack-codec`: encoder, decoder, byte formats, configuration and the
//!   `Pickler` facade

pub use refpack_codec::{
    Decoder, Encoder, Format, Packed, PickleConfig, Pickler, UnresolvedPolicy, CONFIG_FILE_NAME,
};
pub use refpack_core::{
    parse_dbref, resolve_record, same_entity, DirectoryService, Entity, EntityHandle, EntityId,
    EntityModel, Error, MapKey, PackedRef, Result, TypeKey, TypeKeyError, Value,
    PACKED_SENTINEL,
};
pub use refpack_directory::{MemoryDirectory, MemoryModel, MemoryRecord, TypeKeyDirectory};
