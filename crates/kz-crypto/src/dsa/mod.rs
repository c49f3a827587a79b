//! # DSA Keys
//!
//! Public and private DSA keys, their JSON records, their streams, and
//! the sources keys are loaded from.

pub mod private;
pub mod public;
pub mod source;

pub use private::{DsaPrivateKey, DsaPrivateKeyRecord, DsaSigningStream};
pub use public::{DsaPublicKey, DsaPublicKeyRecord, DsaVerifyingStream};
pub use source::{KeySource, SourceError, PRIVATE_KEY_ENV};
