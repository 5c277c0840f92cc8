//! Encoder, decoder and byte formats for entity-reference pickling
//!
//! The [`Encoder`] replaces live entities in a [`Value`](refpack_core::Value)
//! with packed `(type_key, id)` references; the [`Decoder`] turns them back
//! into live entities through the type-key directory. [`Pickler`] bundles
//! both with a [`PickleConfig`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod format;
pub mod pickler;

pub use config::{PickleConfig, UnresolvedPolicy, CONFIG_FILE_NAME};
pub use decoder::Decoder;
pub use encoder::{Encoder, Packed};
pub use format::Format;
pub use pickler::Pickler;
