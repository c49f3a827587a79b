//! # Key Types and Generation Parameters
//!
//! `KeyType` is the explicit variant over key algorithms. Generic code
//! dispatches on it instead of on concrete key structs.

use serde::{Deserialize, Serialize};

/// Size in bytes reserved for a DSA signature slot in container formats.
///
/// Fixed envelope constant, independent of the variable-length DER
/// signature the provider emits.
pub const DSA_DIGEST_SIZE: usize = 48;

/// Supported key algorithms and roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    /// DSA private key (signs and verifies).
    DsaPriv,
    /// DSA public key (verifies only).
    DsaPub,
}

impl KeyType {
    /// Returns the canonical type name, e.g. `"DSA_PRIV"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DsaPriv => "DSA_PRIV",
            Self::DsaPub => "DSA_PUB",
        }
    }

    /// Modulus size used when the caller does not ask for one.
    pub fn default_size(&self) -> u32 {
        match self {
            Self::DsaPriv | Self::DsaPub => 1024,
        }
    }

    /// Modulus sizes the provider can generate for this type.
    pub fn accepted_sizes(&self) -> &'static [u32] {
        match self {
            Self::DsaPriv | Self::DsaPub => &[1024, 2048, 3072],
        }
    }

    /// Whether `size` is one of [`accepted_sizes`](Self::accepted_sizes).
    pub fn is_accepted_size(&self, size: u32) -> bool {
        self.accepted_sizes().contains(&size)
    }

    /// Signature slot size for container formats.
    pub fn output_size(&self) -> usize {
        match self {
            Self::DsaPriv | Self::DsaPub => DSA_DIGEST_SIZE,
        }
    }

    /// Whether keys of this type hold private material.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::DsaPriv)
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for generating a fresh key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParameters {
    /// Requested modulus bit length.
    pub key_size: u32,
}

impl KeyParameters {
    /// Parameters with an explicit size.
    pub fn with_size(key_size: u32) -> Self {
        Self { key_size }
    }

    /// Default parameters for `key_type`.
    pub fn for_type(key_type: KeyType) -> Self {
        Self {
            key_size: key_type.default_size(),
        }
    }
}

impl Default for KeyParameters {
    fn default() -> Self {
        Self::for_type(KeyType::DsaPriv)
    }
}
