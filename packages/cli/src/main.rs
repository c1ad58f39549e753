//! `bftx` — Blockfreight transaction command-line interface.
//!
//! Subcommands for working with BF_TX documents:
//!
//! - **`validate`** — run the structural checks and print the result.
//! - **`hash`** — print the content digest, optionally salted.
//! - **`state`** — print the lifecycle state.
//! - **`render`** — print a deep human-readable dump.
//! - **`reset`** — print the document with its process attributes cleared.
//! - **`fields`** — list the checked leaves, with values if a file is given.
//! - **`sign`** / **`verify`** — Ed25519 signing with a seed from `BFTX_SIGNING_SEED`.
//!
//! Every FILE argument may be `-` to read from stdin.

mod config;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use bftx::digest::to_hex;
use bftx::render;
use bftx::validation::LEAVES;
use bftx::{
    content_digest, salted_digest, sign_transaction, validate_report, verify_transaction,
    Ed25519Signer, Transaction,
};
use clap::{Parser, Subcommand};

use config::CliConfig;

/// bftx — Blockfreight transaction CLI
///
/// Validate, hash, sign and inspect BF_TX documents.
#[derive(Parser)]
#[command(name = "bftx", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check every field of a BF_TX document.
    ///
    /// Prints `Success! [OK]` and exits 0 when valid. Otherwise prints the
    /// diagnostic to stderr and exits 1.
    Validate {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Print the SHA-256 content digest as hex.
    Hash {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,

        /// Hash the digest again with this salt appended.
        #[arg(long, env = "BFTX_SALT", value_name = "TEXT")]
        salt: Option<String>,
    },

    /// Print the lifecycle state: Constructed!, Signed! or Transmitted!
    State {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Print a deep human-readable dump of the transaction.
    Render {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Print the transaction as JSON with signing and transmission cleared.
    Reset {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// List the fields the validator checks, in order.
    ///
    /// With FILE, also prints each field's current value.
    Fields {
        /// Optional path to a JSON file, or `-` for stdin.
        file: Option<PathBuf>,
    },

    /// Sign a valid transaction and print it as JSON.
    ///
    /// The Ed25519 seed is read from BFTX_SIGNING_SEED (64 hex chars).
    Sign {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Verify a signed transaction against the key from BFTX_SIGNING_SEED.
    Verify {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },
}

fn main() {
    let config = CliConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { file } => {
            let tx = load(&file);
            match validate_report(&tx) {
                Ok(ok) => println!("{ok}"),
                Err(report) => {
                    eprintln!("{}", report.diagnostic());
                    eprintln!("error: {report}");
                    process::exit(1);
                }
            }
        }

        Command::Hash { file, salt } => {
            let tx = load(&file);
            let digest = content_digest(&tx)
                .unwrap_or_else(|e| fatal(&format!("failed to hash transaction: {e}")));
            match salt {
                Some(salt) => println!("{}", to_hex(&salted_digest(&digest, salt.as_bytes()))),
                None => println!("{}", to_hex(&digest)),
            }
        }

        Command::State { file } => {
            println!("{}", load(&file).state());
        }

        Command::Render { file } => {
            let tx = load(&file);
            render::dump(&tx, io::stdout().lock())
                .unwrap_or_else(|e| fatal(&format!("failed to render transaction: {e}")));
        }

        Command::Reset { file } => {
            let tx = load(&file).reinitialized();
            print_json(&tx);
        }

        Command::Fields { file } => {
            let tx = file.as_deref().map(load);
            for leaf in &LEAVES {
                match &tx {
                    Some(tx) => println!("{:<70} {:<12} {}", leaf.path, leaf.kind, leaf.value(tx)),
                    None => println!("{:<70} {}", leaf.path, leaf.kind),
                }
            }
        }

        Command::Sign { file } => {
            let signer = signer_from(&config);
            let mut tx = load(&file);
            // Only structurally valid transactions get signed.
            if let Err(report) = validate_report(&tx) {
                fatal(&format!("refusing to sign invalid transaction: {report}"));
            }
            sign_transaction(&mut tx, &signer)
                .unwrap_or_else(|e| fatal(&format!("signing failed: {e}")));
            print_json(&tx);
        }

        Command::Verify { file } => {
            let signer = signer_from(&config);
            let tx = load(&file);
            match verify_transaction(&tx, &signer.verifying_key()) {
                Ok(()) => println!("verified"),
                Err(e) => {
                    eprintln!("error: {e}");
                    process::exit(1);
                }
            }
        }
    }
}

/// Read and decode a transaction from a file, or stdin when the path is `"-"`.
fn load(path: &Path) -> Transaction {
    tracing::debug!(path = %path.display(), "loading BF_TX");
    let result = if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {e}")));
        Transaction::from_slice(&buf)
    } else {
        Transaction::from_path(path)
    };
    result.unwrap_or_else(|e| fatal(&e.to_string()))
}

fn print_json(tx: &Transaction) {
    let json = tx
        .to_json_pretty()
        .unwrap_or_else(|e| fatal(&e.to_string()));
    println!("{json}");
}

fn signer_from(config: &CliConfig) -> Ed25519Signer {
    let seed = config.seed_bytes().unwrap_or_else(|e| fatal(&e));
    Ed25519Signer::from_seed(&seed)
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("bftx: {msg}");
    process::exit(2);
}
