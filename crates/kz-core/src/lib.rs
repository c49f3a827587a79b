//! # kz-core — Foundational Types for the kz Key Toolkit
//!
//! Defines the algorithm-independent pieces every key implementation
//! builds on. Algorithm crates depend on `kz-core`; it depends on nothing
//! internal.
//!
//! ## Contents
//!
//! 1. **`KeyError`.** One error taxonomy for loading, generation, and
//!    stream sessions.
//!
//! 2. **Web-safe integer codec.** Key records store big integers as
//!    base64url big-endian magnitudes without padding.
//!
//! 3. **`KeyType` and `KeyParameters`.** The explicit variant over key
//!    algorithms and the knobs for generating them.
//!
//! 4. **`KeyczarKey` and streams.** The uniform capability surface
//!    (`hash`, `key_type`, `size`, `get_stream`, `to_json`) and the
//!    sign/verify session traits.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod encoding;
pub mod error;
pub mod key;
pub mod key_type;
pub mod stream;

pub use encoding::{decode_unsigned, encode_unsigned};
pub use error::KeyError;
pub use key::{KeyHash, KeyczarKey, KeyczarPrivateKey, KeyczarPublicKey, KEY_HASH_SIZE};
pub use key_type::{KeyParameters, KeyType, DSA_DIGEST_SIZE};
pub use stream::{DualStream, KeyStream, SigningStream, Stream, StreamState, VerifyingStream};
