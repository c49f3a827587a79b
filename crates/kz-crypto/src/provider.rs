//! # DSA Provider
//!
//! Thin seam over the RustCrypto `dsa` crate. Everything that touches DSA
//! arithmetic, parameter validation, or randomness goes through here, and
//! every provider failure leaves this module as a [`KeyError`].
//!
//! ## Parameter Sets
//!
//! | Modulus (L) | Subgroup (N) |
//! |-------------|--------------|
//! | 1024        | 160          |
//! | 2048        | 256          |
//! | 3072        | 256          |

use der::asn1::UintRef;
use der::{Decode, Reader, SliceReader};
use dsa::{BigUint, Components, KeySize, SigningKey, VerifyingKey};
use kz_core::KeyError;
use rand_core::OsRng;

/// Provider algorithm name for key generation.
pub const KEY_GEN_ALGORITHM: &str = "DSA";

/// Provider algorithm name for the signature primitive.
pub const SIG_ALGORITHM: &str = "SHA1withDSA";

/// Digest fed to the signature primitive.
pub type SignatureDigest = sha1::Sha1;

/// Map a modulus size onto a provider parameter set.
#[allow(deprecated)]
pub fn key_size_for(bits: u32) -> Option<KeySize> {
    match bits {
        1024 => Some(KeySize::DSA_1024_160),
        2048 => Some(KeySize::DSA_2048_256),
        3072 => Some(KeySize::DSA_3072_256),
        _ => None,
    }
}

/// Generate fresh domain parameters and a key pair of `bits` modulus size.
pub fn generate_key_pair(bits: u32) -> Result<SigningKey, KeyError> {
    let key_size = key_size_for(bits).ok_or_else(|| {
        KeyError::key_generation(format!(
            "unsupported {KEY_GEN_ALGORITHM} key size {bits}; expected 1024, 2048, or 3072"
        ))
    })?;
    tracing::debug!(bits, "generating {KEY_GEN_ALGORITHM} domain parameters");
    let components = Components::generate(&mut OsRng, key_size);
    Ok(SigningKey::generate(&mut OsRng, components))
}

/// Build a verifying key from big-endian magnitudes of `p, q, g, y`.
pub fn verifying_key(p: &[u8], q: &[u8], g: &[u8], y: &[u8]) -> Result<VerifyingKey, KeyError> {
    let components = Components::from_components(
        BigUint::from_bytes_be(p),
        BigUint::from_bytes_be(q),
        BigUint::from_bytes_be(g),
    )
    .map_err(|e| KeyError::activation("DSA domain parameters rejected", e))?;
    VerifyingKey::from_components(components, BigUint::from_bytes_be(y))
        .map_err(|e| KeyError::activation("DSA public value rejected", e))
}

/// Build a signing key from its verifying key and the big-endian
/// magnitude of the private exponent `x`.
pub fn signing_key(verifying_key: VerifyingKey, x: &[u8]) -> Result<SigningKey, KeyError> {
    SigningKey::from_components(verifying_key, BigUint::from_bytes_be(x))
        .map_err(|e| KeyError::activation("DSA private exponent rejected", e))
}

/// Whether `bytes` is exactly one DER `SEQUENCE` of two non-negative
/// `INTEGER`s, the structural shape of a DSA signature.
///
/// Component ranges are not checked.
pub fn is_integer_pair(bytes: &[u8]) -> bool {
    let Ok(mut reader) = SliceReader::new(bytes) else {
        return false;
    };
    let parsed = reader.sequence(|seq| {
        UintRef::decode(seq)?;
        UintRef::decode(seq)?;
        Ok(())
    });
    parsed.is_ok() && reader.is_finished()
}

/// Bit length of the modulus `p`.
pub fn modulus_bits(key: &VerifyingKey) -> u32 {
    u32::try_from(key.components().p().bits()).unwrap_or(u32::MAX)
}
