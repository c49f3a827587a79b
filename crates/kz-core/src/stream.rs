//! # Signing and Verifying Streams
//!
//! A stream is a stateful session bound to one key. The caller picks a
//! role with `init_sign` or `init_verify`, feeds data with the matching
//! `update_*` call any number of times, then finalizes once.
//!
//! ```text
//! Created ──init_sign()───▶ ReadySign ──update_sign()*──sign()────▶ Finalized
//!    │                                                                 │
//!    └─────init_verify()──▶ ReadyVerify ──update_verify()*──verify()──┘
//! ```
//!
//! `Finalized` is terminal for the session. Calling `init_*` again starts
//! a new session on the same stream.
//!
//! Streams are `Send` but hold no locks: one session runs on one thread.
//! Independent streams from the same key may run concurrently.

use crate::error::KeyError;

/// Position of a stream in its session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    /// No session started.
    Created,
    /// Signing session open.
    ReadySign,
    /// Verifying session open.
    ReadyVerify,
    /// Session finished; re-init required.
    Finalized,
}

impl StreamState {
    /// The canonical string name of this state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::ReadySign => "READY_SIGN",
            Self::ReadyVerify => "READY_VERIFY",
            Self::Finalized => "FINALIZED",
        }
    }
}

impl std::fmt::Display for StreamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Behaviour common to every stream.
pub trait Stream: Send {
    /// Envelope size reserved for this stream's output.
    fn digest_size(&self) -> usize;

    /// Current session state.
    fn state(&self) -> StreamState;
}

/// Verify role of a stream.
pub trait VerifyingStream: Stream {
    /// Open a verifying session.
    fn init_verify(&mut self) -> Result<(), KeyError>;

    /// Feed signed data, in order.
    fn update_verify(&mut self, input: &[u8]) -> Result<(), KeyError>;

    /// Check `signature` against all data fed since `init_verify`.
    ///
    /// `Ok(false)` for a well-formed but invalid signature; an error for a
    /// structurally malformed blob or a session that was never opened.
    fn verify(&mut self, signature: &[u8]) -> Result<bool, KeyError>;
}

/// Sign role of a stream.
pub trait SigningStream: Stream {
    /// Open a signing session.
    fn init_sign(&mut self) -> Result<(), KeyError>;

    /// Feed data to sign, in order.
    fn update_sign(&mut self, input: &[u8]) -> Result<(), KeyError>;

    /// Finalize and append the raw signature to `output`.
    fn sign(&mut self, output: &mut Vec<u8>) -> Result<(), KeyError>;
}

/// A stream supporting both roles (one per session).
pub trait DualStream: SigningStream + VerifyingStream {}

impl<T: SigningStream + VerifyingStream> DualStream for T {}

/// Stream handed out by [`KeyczarKey::get_stream`](crate::key::KeyczarKey::get_stream).
///
/// Private keys hand out a `SignVerify` stream, public keys a `Verify`
/// stream. The sign role on a `Verify` stream fails instead of panicking.
pub enum KeyStream {
    /// Stream of a private key.
    SignVerify(Box<dyn DualStream>),
    /// Stream of a public key.
    Verify(Box<dyn VerifyingStream>),
}

impl KeyStream {
    /// Envelope size reserved for this stream's output.
    pub fn digest_size(&self) -> usize {
        match self {
            Self::SignVerify(s) => s.digest_size(),
            Self::Verify(s) => s.digest_size(),
        }
    }

    /// Current session state.
    pub fn state(&self) -> StreamState {
        match self {
            Self::SignVerify(s) => s.state(),
            Self::Verify(s) => s.state(),
        }
    }

    /// Whether this stream can sign.
    pub fn can_sign(&self) -> bool {
        matches!(self, Self::SignVerify(_))
    }

    /// Open a signing session. [`KeyError::CryptoInit`] on a `Verify` stream.
    pub fn init_sign(&mut self) -> Result<(), KeyError> {
        match self {
            Self::SignVerify(s) => s.init_sign(),
            Self::Verify(_) => Err(KeyError::CryptoInit(
                "public key streams cannot sign".to_string(),
            )),
        }
    }

    /// Feed data to sign, in order.
    pub fn update_sign(&mut self, input: &[u8]) -> Result<(), KeyError> {
        match self {
            Self::SignVerify(s) => s.update_sign(input),
            Self::Verify(_) => Err(KeyError::signing("public key streams cannot sign")),
        }
    }

    /// Finalize and append the raw signature to `output`.
    pub fn sign(&mut self, output: &mut Vec<u8>) -> Result<(), KeyError> {
        match self {
            Self::SignVerify(s) => s.sign(output),
            Self::Verify(_) => Err(KeyError::signing("public key streams cannot sign")),
        }
    }

    /// Open a verifying session.
    pub fn init_verify(&mut self) -> Result<(), KeyError> {
        match self {
            Self::SignVerify(s) => s.init_verify(),
            Self::Verify(s) => s.init_verify(),
        }
    }

    /// Feed signed data, in order.
    pub fn update_verify(&mut self, input: &[u8]) -> Result<(), KeyError> {
        match self {
            Self::SignVerify(s) => s.update_verify(input),
            Self::Verify(s) => s.update_verify(input),
        }
    }

    /// Check `signature` against all data fed since `init_verify`.
    pub fn verify(&mut self, signature: &[u8]) -> Result<bool, KeyError> {
        match self {
            Self::SignVerify(s) => s.verify(signature),
            Self::Verify(s) => s.verify(signature),
        }
    }
}

impl std::fmt::Debug for KeyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = if self.can_sign() { "SignVerify" } else { "Verify" };
        write!(f, "KeyStream::{role}({})", self.state())
    }
}
