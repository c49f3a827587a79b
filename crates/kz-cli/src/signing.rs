//! # Sign and Verify Subcommands
//!
//! SHA1withDSA signatures over whole files. Signatures travel as
//! base64url text without padding.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use kz_core::encoding::{decode_web_safe, encode_web_safe};
use kz_core::KeyczarKey;
use kz_crypto::KeySource;

/// Arguments for the sign subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Private key file. Falls back to `KZ_DSA_PRIVATE_KEY`.
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// File to sign.
    #[arg(long = "in")]
    pub input: PathBuf,
}

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Private or public key file. Falls back to `KZ_DSA_PRIVATE_KEY`.
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// File the signature covers.
    #[arg(long = "in")]
    pub input: PathBuf,

    /// Base64url signature.
    #[arg(long)]
    pub sig: String,
}

/// Outcome of a verify run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The signature matches the file.
    Valid,
    /// Well-formed signature that does not match.
    Invalid,
}

/// Sign the input file and print the base64url signature.
pub fn run_sign(args: &SignArgs, stdout: &mut impl Write) -> anyhow::Result<()> {
    let source = KeySource::resolve(args.key.as_deref());
    let key = source
        .load_private()
        .with_context(|| format!("loading key from {source}"))?;
    let data = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let signature = key.sign(&data)?;
    tracing::info!(key_hash = %key.hash(), bytes = data.len(), "signed file");
    writeln!(stdout, "{}", encode_web_safe(&signature))?;
    Ok(())
}

/// Verify the signature over the input file and print the verdict.
pub fn run_verify(args: &VerifyArgs, stdout: &mut impl Write) -> anyhow::Result<Verdict> {
    let source = KeySource::resolve(args.key.as_deref());
    let public = source
        .load_public()
        .with_context(|| format!("loading key from {source}"))?;
    let data = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let signature = decode_web_safe(&args.sig).context("signature is not base64url")?;

    let verdict = if public.verify(&data, &signature)? {
        Verdict::Valid
    } else {
        Verdict::Invalid
    };
    tracing::info!(key_hash = %public.hash(), ?verdict, "verified file");
    writeln!(
        stdout,
        "{}",
        match verdict {
            Verdict::Valid => "valid",
            Verdict::Invalid => "invalid",
        }
    )?;
    Ok(verdict)
}
