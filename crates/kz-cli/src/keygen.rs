//! # Create and Pubkey Subcommands
//!
//! Key creation and public key export.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use kz_core::{KeyParameters, KeyType, KeyczarKey};
use kz_crypto::{DsaPrivateKey, KeySource};

/// Arguments for the create subcommand.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Modulus size in bits (1024, 2048, or 3072).
    #[arg(long, default_value_t = KeyType::DsaPriv.default_size())]
    pub size: u32,

    /// Write the key record here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the pubkey subcommand.
#[derive(Args, Debug)]
pub struct PubkeyArgs {
    /// Private key file. Falls back to `KZ_DSA_PRIVATE_KEY`.
    #[arg(long)]
    pub key: Option<PathBuf>,
}

/// Generate a key and write its JSON record to `--out` or `stdout`.
pub fn run_create(args: &CreateArgs, stdout: &mut impl Write) -> anyhow::Result<()> {
    if !KeyType::DsaPriv.is_accepted_size(args.size) {
        anyhow::bail!(
            "unsupported key size {}; accepted sizes are {:?}",
            args.size,
            KeyType::DsaPriv.accepted_sizes()
        );
    }
    let key = DsaPrivateKey::generate(KeyParameters::with_size(args.size))
        .context("generating DSA key")?;
    let json = key.to_json()?;
    tracing::info!(key_hash = %key.hash(), size = key.size(), "created DSA key");

    match &args.out {
        Some(path) => std::fs::write(path, &json)
            .with_context(|| format!("writing key to {}", path.display()))?,
        None => writeln!(stdout, "{json}")?,
    }
    Ok(())
}

/// Write the public key record of the loaded private key.
pub fn run_pubkey(args: &PubkeyArgs, stdout: &mut impl Write) -> anyhow::Result<()> {
    let source = KeySource::resolve(args.key.as_deref());
    let public = source
        .load_public()
        .with_context(|| format!("loading key from {source}"))?;
    writeln!(stdout, "{}", public.to_json()?)?;
    Ok(())
}
