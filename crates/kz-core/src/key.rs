//! # Uniform Key Surface
//!
//! The capability set a key-management layer uses to treat every key
//! algorithm alike: identify it (`hash`, `key_type`, `size`), serialize
//! it (`to_json`), and open a stream (`get_stream`). All traits are object
//! safe so keys can be held as `Box<dyn KeyczarKey>`.

use sha1::{Digest, Sha1};

use crate::error::KeyError;
use crate::key_type::KeyType;
use crate::stream::KeyStream;

/// Number of bytes in a key hash.
pub const KEY_HASH_SIZE: usize = 4;

/// Short identifier of a key, derived from its public components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyHash(pub [u8; KEY_HASH_SIZE]);

impl KeyHash {
    /// Hash a sequence of components.
    ///
    /// Each component is fed to SHA-1 as a 4-byte big-endian length
    /// followed by its bytes. The hash is the first [`KEY_HASH_SIZE`]
    /// bytes of the digest.
    pub fn from_components(components: &[&[u8]]) -> Self {
        let mut hasher = Sha1::new();
        for component in components {
            let len = u32::try_from(component.len()).unwrap_or(u32::MAX);
            hasher.update(len.to_be_bytes());
            hasher.update(component);
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; KEY_HASH_SIZE];
        bytes.copy_from_slice(&digest[..KEY_HASH_SIZE]);
        Self(bytes)
    }

    /// Return the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_HASH_SIZE] {
        &self.0
    }

    /// Render the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for KeyHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Operations every key exposes, regardless of algorithm.
pub trait KeyczarKey: Send + Sync + std::fmt::Debug {
    /// Identifier derived from the public components.
    fn hash(&self) -> KeyHash;

    /// Provider algorithm name used to generate keys of this kind.
    fn key_gen_algorithm(&self) -> &'static str;

    /// Algorithm and role of this key.
    fn key_type(&self) -> KeyType;

    /// Modulus bit length.
    fn size(&self) -> u32;

    /// Open a new, independent stream session on this key.
    fn get_stream(&self) -> Result<KeyStream, KeyError>;

    /// Canonical JSON record of this key.
    fn to_json(&self) -> Result<String, KeyError>;
}

/// A key that only verifies.
pub trait KeyczarPublicKey: KeyczarKey {}

/// A key holding private material, paired with a public key.
pub trait KeyczarPrivateKey: KeyczarKey {
    /// The paired public key.
    fn public(&self) -> &dyn KeyczarPublicKey;
}
