//! Byte formats for encoded values
//!
//! An encoded value holds only scalars, lists, tuples, maps and packed
//! references, so any self-consistent serde format can carry it. Both
//! formats below keep `Tuple`, `List` and `Map` apart, which the decoder
//! relies on.

use refpack_core::{Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serializer used for the byte form of a pickle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    /// MessagePack via `rmp-serde`
    #[default]
    #[serde(rename = "msgpack")]
    MessagePack,
    /// Bincode 1.x
    #[serde(rename = "bincode")]
    Bincode,
}

impl Format {
    /// Name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            Format::MessagePack => "msgpack",
            Format::Bincode => "bincode",
        }
    }

    /// Write an encoded value to bytes
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the value still holds a live entity.
    pub fn serialize(&self, value: &Value) -> Result<Vec<u8>> {
        let bytes = match self {
            Format::MessagePack => rmp_serde::to_vec(value)?,
            Format::Bincode => bincode::serialize(value)?,
        };
        Ok(bytes)
    }

    /// Read an encoded value back from bytes
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` for malformed input.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        let value = match self {
            Format::MessagePack => rmp_serde::from_slice(bytes)?,
            Format::Bincode => bincode::deserialize(bytes)?,
        };
        Ok(value)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "msgpack" => Ok(Format::MessagePack),
            "bincode" => Ok(Format::Bincode),
            other => Err(Error::Config(format!(
                "unknown format '{}' (expected \"msgpack\" or \"bincode\")",
                other
            ))),
        }
    }
}
