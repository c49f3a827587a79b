//! # DSA Private Keys
//!
//! A DSA private key is built in one of two ways:
//!
//! - **Eager:** [`DsaPrivateKey::generate`] asks the provider for a fresh key
//!   pair and wraps it. The native handle exists immediately.
//! - **Lazy:** [`DsaPrivateKeyRecord`] is the inert form decoded from JSON.
//!   [`DsaPrivateKeyRecord::activate`] is the only way to turn it into a
//!   [`DsaPrivateKey`], and it consumes the record, so activation happens
//!   exactly once. [`DsaPrivateKey::read`] does both steps.
//!
//! ## Security Invariant
//!
//! An inert record has no stream. Signing before activation does not
//! compile:
//!
//! ```compile_fail
//! use kz_crypto::dsa::DsaPrivateKeyRecord;
//!
//! let record = DsaPrivateKeyRecord::from_json("{}").unwrap();
//! // ERROR: no method named `get_stream` found for `DsaPrivateKeyRecord`
//! let _stream = record.get_stream();
//! ```
//!
//! The private exponent text is zeroized when a record or key is dropped,
//! and `Debug` output never includes it.
//!
//! ## Serialized Form
//!
//! ```json
//! { "size": 1024, "publicKey": { "size": 1024, "p": "..", "q": "..", "g": "..", "y": ".." }, "x": ".." }
//! ```

use std::sync::Arc;

use dsa::SigningKey;
use serde::{Deserialize, Serialize};
use sha1::Digest;
use signature::{DigestSigner, SignatureEncoding};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use kz_core::{
    decode_unsigned, encode_unsigned, KeyError, KeyHash, KeyParameters, KeyStream, KeyType,
    KeyczarKey, KeyczarPrivateKey, KeyczarPublicKey, SigningStream, Stream, StreamState,
    VerifyingStream, DSA_DIGEST_SIZE,
};

use super::public::{DsaPublicKey, DsaPublicKeyRecord, DsaVerifyingStream};
use crate::provider::{self, SignatureDigest, KEY_GEN_ALGORITHM};

/// Inert private key record, exactly as serialized. Holds no native handle.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DsaPrivateKeyRecord {
    /// Modulus bit length.
    pub size: u32,
    /// The paired public key record.
    #[serde(rename = "publicKey")]
    #[zeroize(skip)]
    pub public_key: DsaPublicKeyRecord,
    /// Private exponent.
    pub x: String,
}

impl DsaPrivateKeyRecord {
    /// Parse a record from JSON text without activating it.
    ///
    /// Requires `size` (integer), `publicKey` (object), and `x` (string).
    pub fn from_json(input: &str) -> Result<Self, KeyError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Activate the nested public key, decode `x`, and build the native
    /// private handle.
    pub fn activate(self) -> Result<DsaPrivateKey, KeyError> {
        let public_key = self.public_key.clone().activate()?;
        let x = Zeroizing::new(decode_unsigned("x", &self.x)?);
        let key_hash = public_key.hash();
        let handle = provider::signing_key(public_key.verifying_key().clone(), &x).map_err(|e| {
            tracing::warn!(%key_hash, error = %e, "DSA private key rejected by provider");
            e
        })?;
        tracing::debug!(%key_hash, size = self.size, "activated DSA private key");
        Ok(DsaPrivateKey {
            size: self.size,
            x: Zeroizing::new(self.x.clone()),
            public_key,
            handle: Arc::new(handle),
        })
    }
}

impl std::fmt::Debug for DsaPrivateKeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DsaPrivateKeyRecord")
            .field("size", &self.size)
            .field("public_key", &self.public_key)
            .field("x", &"<private>")
            .finish()
    }
}

/// An activated DSA private key.
///
/// Immutable after construction. The native handle is shared read-only
/// with every stream opened on the key.
#[derive(Clone)]
pub struct DsaPrivateKey {
    size: u32,
    x: Zeroizing<String>,
    public_key: DsaPublicKey,
    handle: Arc<SigningKey>,
}

impl DsaPrivateKey {
    /// Generate a fresh key pair at `params.key_size` bits.
    pub fn generate(params: KeyParameters) -> Result<Self, KeyError> {
        let signing_key = provider::generate_key_pair(params.key_size)?;
        let key = Self::from_signing_key(signing_key);
        tracing::debug!(key_hash = %key.hash(), size = key.size, "generated DSA private key");
        Ok(key)
    }

    /// Parse and activate a private key from its JSON record.
    ///
    /// Every parse or decode failure is [`KeyError::MalformedKey`]; provider
    /// rejection of the decoded components is [`KeyError::Activation`].
    pub fn read(input: &str) -> Result<Self, KeyError> {
        DsaPrivateKeyRecord::from_json(input)?.activate()
    }

    /// Wrap a provider signing key, deriving its record fields.
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key = DsaPublicKey::from_verifying_key(signing_key.verifying_key().clone());
        let x_bytes = Zeroizing::new(signing_key.x().to_bytes_be());
        Self {
            size: public_key.size(),
            x: Zeroizing::new(encode_unsigned(&x_bytes)),
            public_key,
            handle: Arc::new(signing_key),
        }
    }

    /// The inert record of this key.
    pub fn to_record(&self) -> DsaPrivateKeyRecord {
        DsaPrivateKeyRecord {
            size: self.size,
            public_key: self.public_key.record().clone(),
            x: self.x.as_str().to_owned(),
        }
    }

    /// The paired public key.
    pub fn public_key(&self) -> &DsaPublicKey {
        &self.public_key
    }

    /// Open a typed signing/verifying stream.
    pub fn signing_stream(&self) -> DsaSigningStream {
        DsaSigningStream {
            key: Arc::clone(&self.handle),
            digest: None,
            state: StreamState::Created,
            verifier: self.public_key.verifying_stream(),
        }
    }

    /// Sign `data` in one session and return the raw signature.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, KeyError> {
        let mut stream = self.signing_stream();
        stream.init_sign()?;
        stream.update_sign(data)?;
        let mut signature = Vec::new();
        stream.sign(&mut signature)?;
        Ok(signature)
    }

    /// Verify `signature` over `data` with the paired public key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, KeyError> {
        self.public_key.verify(data, signature)
    }
}

impl KeyczarKey for DsaPrivateKey {
    fn hash(&self) -> KeyHash {
        self.public_key.hash()
    }

    fn key_gen_algorithm(&self) -> &'static str {
        KEY_GEN_ALGORITHM
    }

    fn key_type(&self) -> KeyType {
        KeyType::DsaPriv
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn get_stream(&self) -> Result<KeyStream, KeyError> {
        Ok(KeyStream::SignVerify(Box::new(self.signing_stream())))
    }

    fn to_json(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }
}

impl KeyczarPrivateKey for DsaPrivateKey {
    fn public(&self) -> &dyn KeyczarPublicKey {
        &self.public_key
    }
}

impl std::fmt::Debug for DsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DsaPrivateKey(size={}, hash={}, <private>)", self.size, self.hash())
    }
}

// ---------------------------------------------------------------------------
// Signing stream
// ---------------------------------------------------------------------------

/// Sign/verify stream over a private key.
///
/// The sign role runs SHA1withDSA over the private handle. The verify role
/// is forwarded to the paired public key's [`DsaVerifyingStream`]; this
/// type never checks a signature itself.
pub struct DsaSigningStream {
    key: Arc<SigningKey>,
    digest: Option<SignatureDigest>,
    state: StreamState,
    verifier: DsaVerifyingStream,
}

impl Stream for DsaSigningStream {
    fn digest_size(&self) -> usize {
        DSA_DIGEST_SIZE
    }

    fn state(&self) -> StreamState {
        match self.state {
            StreamState::ReadyVerify => self.verifier.state(),
            other => other,
        }
    }
}

impl SigningStream for DsaSigningStream {
    fn init_sign(&mut self) -> Result<(), KeyError> {
        if self.state() == StreamState::ReadyVerify {
            return Err(KeyError::CryptoInit(
                "stream has an open verify session".to_string(),
            ));
        }
        self.digest = Some(SignatureDigest::new());
        self.state = StreamState::ReadySign;
        Ok(())
    }

    fn update_sign(&mut self, input: &[u8]) -> Result<(), KeyError> {
        match self.digest.as_mut() {
            Some(digest) if self.state == StreamState::ReadySign => {
                digest.update(input);
                Ok(())
            }
            _ => Err(KeyError::signing(format!(
                "update_sign called in state {}; call init_sign first",
                self.state
            ))),
        }
    }

    fn sign(&mut self, output: &mut Vec<u8>) -> Result<(), KeyError> {
        let digest = match (self.state, self.digest.take()) {
            (StreamState::ReadySign, Some(digest)) => digest,
            _ => {
                return Err(KeyError::signing(format!(
                    "sign called in state {}; call init_sign first",
                    self.state
                )))
            }
        };
        self.state = StreamState::Finalized;

        let signature: dsa::Signature = self
            .key
            .try_sign_digest(digest)
            .map_err(|e| KeyError::signing_with("SHA1withDSA signing", e))?;
        let bytes = signature.to_vec();
        tracing::debug!(len = bytes.len(), "DSA sign session finalized");
        output.extend_from_slice(&bytes);
        Ok(())
    }
}

impl VerifyingStream for DsaSigningStream {
    fn init_verify(&mut self) -> Result<(), KeyError> {
        if self.state == StreamState::ReadySign {
            return Err(KeyError::CryptoInit(
                "stream has an open sign session".to_string(),
            ));
        }
        self.digest = None;
        self.state = StreamState::ReadyVerify;
        self.verifier.init_verify()
    }

    fn update_verify(&mut self, input: &[u8]) -> Result<(), KeyError> {
        if self.state != StreamState::ReadyVerify {
            return Err(KeyError::verification(format!(
                "update_verify called in state {}; call init_verify first",
                self.state
            )));
        }
        self.verifier.update_verify(input)
    }

    fn verify(&mut self, signature: &[u8]) -> Result<bool, KeyError> {
        if self.state != StreamState::ReadyVerify {
            return Err(KeyError::verification(format!(
                "verify called in state {}; call init_verify first",
                self.state
            )));
        }
        self.verifier.verify(signature)
    }
}
