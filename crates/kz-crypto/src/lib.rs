//! # kz-crypto — DSA Keys
//!
//! Provides the DSA key type for the kz key toolkit:
//!
//! - **Generation** of fresh key pairs at 1024, 2048, or 3072 bits.
//! - **JSON records** with base64url-encoded scalars, read and written
//!   byte-for-byte.
//! - **Activation** of decoded records into provider handles, in two
//!   phases: inert record first, operational key second.
//! - **Streams** that sign with SHA1withDSA, or forward verification to
//!   the paired public key.
//!
//! All DSA arithmetic and randomness come from the RustCrypto `dsa`
//! crate through [`provider`].
//!
//! ## Crate Policy
//!
//! - Depends only on `kz-core` internally.
//! - No mocking of cryptographic operations in tests.
//! - Private key material never appears in `Debug` output or logs.

pub mod dsa;
pub mod provider;

pub use self::dsa::{
    DsaPrivateKey, DsaPrivateKeyRecord, DsaPublicKey, DsaPublicKeyRecord, DsaSigningStream,
    DsaVerifyingStream, KeySource, SourceError,
};
