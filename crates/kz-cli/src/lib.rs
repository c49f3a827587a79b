//! # kz-cli — kz Command-Line Interface
//!
//! Drives a single DSA key from the shell.
//!
//! ## Subcommands
//!
//! - `create` — generate a private key and write its JSON record
//! - `pubkey` — export the public half of a private key
//! - `sign` — sign a file, printing a base64url signature
//! - `verify` — check a base64url signature over a file
//!
//! Commands that need a key take `--key FILE`; without it the key is read
//! from the `KZ_DSA_PRIVATE_KEY` environment variable. `verify` also
//! accepts the public key record written by `pubkey`.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers.
//! - Handlers delegate to `kz-crypto` and write results to a caller-supplied
//!   writer, so they are testable without a process boundary.

pub mod keygen;
pub mod signing;
