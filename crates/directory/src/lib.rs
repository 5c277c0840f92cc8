//! Type-key directory for refpack
//!
//! This crate provides:
//! - TypeKeyDirectory: the process-wide, lazily loaded cache mapping model
//!   names to type keys and back
//! - MemoryDirectory / MemoryModel: an in-memory directory service

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;
pub mod memory;

pub use directory::TypeKeyDirectory;
pub use memory::{MemoryDirectory, MemoryModel, MemoryRecord};
