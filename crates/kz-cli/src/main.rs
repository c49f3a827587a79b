//! # kz CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kz_cli::signing::Verdict;

/// kz — DSA key toolkit.
///
/// Creates DSA keys, exports their public halves, and signs or verifies
/// files with SHA1withDSA.
#[derive(Parser, Debug)]
#[command(name = "kz", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate a DSA private key.
    Create(kz_cli::keygen::CreateArgs),
    /// Export the public key of a private key.
    Pubkey(kz_cli::keygen::PubkeyArgs),
    /// Sign a file.
    Sign(kz_cli::signing::SignArgs),
    /// Verify a signature over a file.
    Verify(kz_cli::signing::VerifyArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Create(args) => kz_cli::keygen::run_create(&args, &mut stdout)?,
        Commands::Pubkey(args) => kz_cli::keygen::run_pubkey(&args, &mut stdout)?,
        Commands::Sign(args) => kz_cli::signing::run_sign(&args, &mut stdout)?,
        Commands::Verify(args) => {
            if kz_cli::signing::run_verify(&args, &mut stdout)? == Verdict::Invalid {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
