//! # Error Types — Key Error Taxonomy
//!
//! Defines the single error type shared by every key implementation in the
//! toolkit. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! ## Design
//!
//! - Loading failures (`MalformedKey`, `Activation`) abort the whole load.
//!   No partially usable key is ever returned.
//! - Session failures (`CryptoInit`, `Signing`, `Verification`) abort only
//!   the in-progress stream session. The key stays valid.
//! - Provider failures are carried as the error `source()` so the original
//!   cause survives wrapping.
//! - A well-formed but invalid signature is `Ok(false)`, never an error.

use thiserror::Error;

/// Boxed provider-level cause attached to a [`KeyError`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for key loading, generation, and stream sessions.
#[derive(Error, Debug)]
pub enum KeyError {
    /// Serialized key record has missing, mistyped, or undecodable fields.
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// Decoded key components were rejected by the cryptography provider.
    #[error("key activation failed: {message}")]
    Activation {
        /// What was being activated and why it failed.
        message: String,
        /// Provider error, when one exists.
        #[source]
        cause: Option<Cause>,
    },

    /// The provider could not generate a key at the requested parameters.
    #[error("key generation failed: {message}")]
    KeyGeneration {
        /// Requested parameters and the failure reason.
        message: String,
        /// Provider error, when one exists.
        #[source]
        cause: Option<Cause>,
    },

    /// The stream could not bind the key to a signature primitive.
    #[error("stream initialization failed: {0}")]
    CryptoInit(String),

    /// Signing session misuse or provider failure while signing.
    #[error("signing failed: {message}")]
    Signing {
        /// Failure reason.
        message: String,
        /// Provider error, when one exists.
        #[source]
        cause: Option<Cause>,
    },

    /// Signature blob is structurally malformed, or the verify session
    /// was misused.
    #[error("verification failed: {message}")]
    Verification {
        /// Failure reason.
        message: String,
        /// Provider error, when one exists.
        #[source]
        cause: Option<Cause>,
    },
}

impl KeyError {
    /// Activation failure wrapping a provider error.
    pub fn activation<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Activation {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Key generation failure without a provider cause.
    pub fn key_generation(message: impl Into<String>) -> Self {
        Self::KeyGeneration {
            message: message.into(),
            cause: None,
        }
    }

    /// Signing failure without a provider cause (session misuse).
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
            cause: None,
        }
    }

    /// Signing failure wrapping a provider error.
    pub fn signing_with<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Signing {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Verification failure without a provider cause (session misuse).
    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
            cause: None,
        }
    }

    /// Verification failure wrapping a decoding or provider error.
    pub fn verification_with<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Verification {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Whether this error aborted a key load (as opposed to a session).
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedKey(_) | Self::Activation { .. } | Self::KeyGeneration { .. }
        )
    }
}

impl From<serde_json::Error> for KeyError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedKey(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("provider said no")]
    struct ProviderFailure;

    #[test]
    fn malformed_key_display() {
        let err = KeyError::MalformedKey("missing field `x`".to_string());
        assert!(format!("{err}").contains("missing field `x`"));
    }

    #[test]
    fn activation_keeps_cause() {
        let err = KeyError::activation("DSA private key", ProviderFailure);
        assert!(format!("{err}").contains("DSA private key"));
        let cause = err.source().expect("cause should be attached");
        assert_eq!(cause.to_string(), "provider said no");
    }

    #[test]
    fn session_errors_without_cause_have_no_source() {
        assert!(KeyError::signing("no session").source().is_none());
        assert!(KeyError::verification("no session").source().is_none());
        assert!(KeyError::CryptoInit("busy".into()).source().is_none());
    }

    #[test]
    fn load_failures_are_classified() {
        assert!(KeyError::MalformedKey(String::new()).is_load_failure());
        assert!(KeyError::key_generation("size 512").is_load_failure());
        assert!(!KeyError::signing("x").is_load_failure());
        assert!(!KeyError::verification_with("der", ProviderFailure).is_load_failure());
    }

    #[test]
    fn json_errors_become_malformed_key() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = KeyError::from(json_err);
        assert!(matches!(err, KeyError::MalformedKey(_)));
    }
}
