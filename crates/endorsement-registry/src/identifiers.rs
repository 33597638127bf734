//! Identity type for tracked parties
//!
//! An `Identity` is an opaque, address-like key. The registry only ever
//! compares identities for equality; ordering exists so snapshots render
//! deterministically.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of an identity in bytes
pub const IDENTITY_LEN: usize = 20;

/// Opaque address of a party (person or contract) known to a registry.
///
/// Human-readable formats (TOML, JSON) carry the `0x`-hex form; binary
/// formats carry the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    /// Create an identity from raw bytes
    pub fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create an identity with every byte set to `seed`.
    ///
    /// Handy for tests and demo scripts where readable addresses matter more
    /// than realistic ones.
    pub fn from_seed(seed: u8) -> Self {
        Self([seed; IDENTITY_LEN])
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Failure to parse an identity from text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdentityParseError {
    /// Input was not valid hex
    #[error("invalid hex in identity: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Input decoded to the wrong number of bytes
    #[error("identity must be {IDENTITY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Identity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Handle both raw hex and 0x-prefixed format
        let hex_str = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(hex_str)?;
        if bytes.len() != IDENTITY_LEN {
            return Err(IdentityParseError::InvalidLength(bytes.len()));
        }
        let mut array = [0u8; IDENTITY_LEN];
        array.copy_from_slice(&bytes);
        Ok(Identity(array))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(de::Error::custom)
        } else {
            <[u8; IDENTITY_LEN]>::deserialize(deserializer).map(Self)
        }
    }
}

impl From<[u8; IDENTITY_LEN]> for Identity {
    fn from(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }
}
