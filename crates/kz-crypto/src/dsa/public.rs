//! # DSA Public Keys
//!
//! The verifying half of a DSA key pair. Owns the only implementation of
//! SHA1withDSA verification in the crate; private keys forward their
//! verify role here.
//!
//! A signature that is not a DER `SEQUENCE` of two non-negative
//! `INTEGER`s is a [`KeyError::Verification`]. Anything that parses as
//! one but does not check out, including zero or oversized components,
//! is `Ok(false)`.
//!
//! ## Serialized Form
//!
//! ```json
//! { "size": 1024, "p": "<b64url>", "q": "<b64url>", "g": "<b64url>", "y": "<b64url>" }
//! ```

use std::sync::Arc;

use dsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use signature::DigestVerifier;
use sha1::Digest;

use kz_core::{
    decode_unsigned, encode_unsigned, KeyError, KeyHash, KeyStream, KeyType, KeyczarKey,
    KeyczarPublicKey, Stream, StreamState, VerifyingStream, DSA_DIGEST_SIZE,
};

use crate::provider::{self, SignatureDigest, KEY_GEN_ALGORITHM};

/// Inert public key record, exactly as serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsaPublicKeyRecord {
    /// Modulus bit length.
    pub size: u32,
    /// Prime modulus.
    pub p: String,
    /// Prime divisor of `p - 1`.
    pub q: String,
    /// Subgroup generator.
    pub g: String,
    /// Public value `g^x mod p`.
    pub y: String,
}

impl DsaPublicKeyRecord {
    /// Parse a record from JSON text without activating it.
    pub fn from_json(input: &str) -> Result<Self, KeyError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Decode the scalars and build the provider verifying key.
    pub fn activate(self) -> Result<DsaPublicKey, KeyError> {
        let p = decode_unsigned("p", &self.p)?;
        let q = decode_unsigned("q", &self.q)?;
        let g = decode_unsigned("g", &self.g)?;
        let y = decode_unsigned("y", &self.y)?;
        let handle = provider::verifying_key(&p, &q, &g, &y).map_err(|e| {
            tracing::warn!(size = self.size, error = %e, "DSA public key rejected by provider");
            e
        })?;
        let actual = provider::modulus_bits(&handle);
        if actual != self.size {
            tracing::warn!(declared = self.size, actual, "DSA key size does not match modulus");
        }
        let hash =
            KeyHash::from_components(&[p.as_slice(), q.as_slice(), g.as_slice(), y.as_slice()]);
        tracing::debug!(key_hash = %hash, size = self.size, "activated DSA public key");
        Ok(DsaPublicKey {
            record: self,
            handle: Arc::new(handle),
            hash,
        })
    }
}

/// An activated DSA public key.
#[derive(Clone)]
pub struct DsaPublicKey {
    record: DsaPublicKeyRecord,
    handle: Arc<VerifyingKey>,
    hash: KeyHash,
}

impl DsaPublicKey {
    /// Parse and activate a public key from its JSON record.
    pub fn read(input: &str) -> Result<Self, KeyError> {
        DsaPublicKeyRecord::from_json(input)?.activate()
    }

    /// Wrap a provider verifying key, deriving its record.
    pub fn from_verifying_key(handle: VerifyingKey) -> Self {
        let components = handle.components();
        let p = components.p().to_bytes_be();
        let q = components.q().to_bytes_be();
        let g = components.g().to_bytes_be();
        let y = handle.y().to_bytes_be();
        let record = DsaPublicKeyRecord {
            size: provider::modulus_bits(&handle),
            p: encode_unsigned(&p),
            q: encode_unsigned(&q),
            g: encode_unsigned(&g),
            y: encode_unsigned(&y),
        };
        let hash =
            KeyHash::from_components(&[p.as_slice(), q.as_slice(), g.as_slice(), y.as_slice()]);
        Self {
            record,
            handle: Arc::new(handle),
            hash,
        }
    }

    /// The serialized record of this key.
    pub fn record(&self) -> &DsaPublicKeyRecord {
        &self.record
    }

    /// The provider verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.handle
    }

    /// Open a typed verifying stream.
    pub fn verifying_stream(&self) -> DsaVerifyingStream {
        DsaVerifyingStream::new(Arc::clone(&self.handle))
    }

    /// Verify `signature` over `data` in one session.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, KeyError> {
        let mut stream = self.verifying_stream();
        stream.init_verify()?;
        stream.update_verify(data)?;
        stream.verify(signature)
    }
}

impl KeyczarKey for DsaPublicKey {
    fn hash(&self) -> KeyHash {
        self.hash
    }

    fn key_gen_algorithm(&self) -> &'static str {
        KEY_GEN_ALGORITHM
    }

    fn key_type(&self) -> KeyType {
        KeyType::DsaPub
    }

    fn size(&self) -> u32 {
        self.record.size
    }

    fn get_stream(&self) -> Result<KeyStream, KeyError> {
        Ok(KeyStream::Verify(Box::new(self.verifying_stream())))
    }

    fn to_json(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string(&self.record)?)
    }
}

impl KeyczarPublicKey for DsaPublicKey {}

impl PartialEq for DsaPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for DsaPublicKey {}

impl std::fmt::Debug for DsaPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DsaPublicKey(size={}, hash={})", self.record.size, self.hash)
    }
}

// ---------------------------------------------------------------------------
// Verifying stream
// ---------------------------------------------------------------------------

/// Verify-only stream over a public key.
pub struct DsaVerifyingStream {
    key: Arc<VerifyingKey>,
    digest: Option<SignatureDigest>,
    state: StreamState,
}

impl DsaVerifyingStream {
    fn new(key: Arc<VerifyingKey>) -> Self {
        Self {
            key,
            digest: None,
            state: StreamState::Created,
        }
    }
}

impl Stream for DsaVerifyingStream {
    fn digest_size(&self) -> usize {
        DSA_DIGEST_SIZE
    }

    fn state(&self) -> StreamState {
        self.state
    }
}

impl VerifyingStream for DsaVerifyingStream {
    fn init_verify(&mut self) -> Result<(), KeyError> {
        self.digest = Some(SignatureDigest::new());
        self.state = StreamState::ReadyVerify;
        Ok(())
    }

    fn update_verify(&mut self, input: &[u8]) -> Result<(), KeyError> {
        match (self.state, self.digest.as_mut()) {
            (StreamState::ReadyVerify, Some(digest)) => {
                digest.update(input);
                Ok(())
            }
            (state, _) => Err(KeyError::verification(format!(
                "update_verify called in state {state}; call init_verify first"
            ))),
        }
    }

    fn verify(&mut self, signature: &[u8]) -> Result<bool, KeyError> {
        let digest = match (self.state, self.digest.take()) {
            (StreamState::ReadyVerify, Some(digest)) => digest,
            (state, _) => {
                return Err(KeyError::verification(format!(
                    "verify called in state {state}; call init_verify first"
                )))
            }
        };
        self.state = StreamState::Finalized;

        let valid = match dsa::Signature::try_from(signature) {
            Ok(parsed) => self.key.verify_digest(digest, &parsed).is_ok(),
            // Well-formed `SEQUENCE { r, s }` with r or s outside (0, q).
            Err(e) if provider::is_integer_pair(signature) => {
                tracing::debug!(error = %e, "DSA signature components out of range");
                false
            }
            Err(e) => return Err(KeyError::verification_with("malformed DSA signature", e)),
        };
        tracing::debug!(valid, "DSA verify session finalized");
        Ok(valid)
    }
}
