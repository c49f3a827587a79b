//! # Key Sources
//!
//! Where a serialized key comes from: a file on disk, or an environment
//! variable holding the JSON record. Suitable for container deployments
//! where secrets are injected via environment. Signing needs a private
//! record; verification accepts a public record as well.
//!
//! ```bash
//! export KZ_DSA_PRIVATE_KEY='{"size":1024,"publicKey":{...},"x":"..."}'
//! ```

use std::path::{Path, PathBuf};

use serde::de::IgnoredAny;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use kz_core::KeyError;

use super::private::DsaPrivateKey;
use super::public::DsaPublicKey;

/// Environment variable consulted when no key file is given.
pub const PRIVATE_KEY_ENV: &str = "KZ_DSA_PRIVATE_KEY";

/// Errors from locating or loading a key.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The key file could not be read.
    #[error("cannot read key file {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Neither a file nor the environment variable was provided.
    #[error("no key file given and environment variable {0} is not set")]
    MissingEnv(String),

    /// The key text was found but did not load.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Location of a serialized private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// A JSON key file.
    File(PathBuf),
    /// An environment variable holding the JSON record.
    Env(String),
}

impl KeySource {
    /// Use `path` when given, otherwise [`PRIVATE_KEY_ENV`].
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Env(PRIVATE_KEY_ENV.to_string()),
        }
    }

    /// Read the raw JSON text. Zeroized when dropped.
    pub fn read_text(&self) -> Result<Zeroizing<String>, SourceError> {
        match self {
            Self::File(path) => std::fs::read_to_string(path)
                .map(Zeroizing::new)
                .map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                }),
            Self::Env(var) => std::env::var(var)
                .map(Zeroizing::new)
                .map_err(|_| SourceError::MissingEnv(var.clone())),
        }
    }

    /// Load and activate the private key.
    pub fn load_private(&self) -> Result<DsaPrivateKey, SourceError> {
        let text = self.read_text()?;
        let key = DsaPrivateKey::read(&text)?;
        tracing::debug!(source = %self, "loaded DSA private key");
        Ok(key)
    }

    /// Load a public key.
    ///
    /// Accepts either record form: a private record (identified by its `x`
    /// field) yields its public half, anything else is read as a public
    /// record.
    pub fn load_public(&self) -> Result<DsaPublicKey, SourceError> {
        let text = self.read_text()?;
        let shape: RecordShape = serde_json::from_str(&text).map_err(KeyError::from)?;
        let key = if shape.x.is_some() {
            DsaPrivateKey::read(&text)?.public_key().clone()
        } else {
            DsaPublicKey::read(&text)?
        };
        tracing::debug!(source = %self, private = shape.x.is_some(), "loaded DSA public key");
        Ok(key)
    }
}

/// Presence of the private exponent, without copying it.
#[derive(Deserialize)]
struct RecordShape {
    #[serde(default)]
    x: Option<IgnoredAny>,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Env(var) => write!(f, "env:{var}"),
        }
    }
}
