//! Reference implementation of the Blockfreight transaction (BF_TX) standard.
//!
//! This crate provides the nested bill-of-lading data model, the structural
//! validator, content digests, and a diagnostic renderer. It is the library
//! behind the `bftx` command-line tool.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | The [`Transaction`] record and its property tree |
//! | [`document`] | Loading and serialising the JSON document form |
//! | [`validation`] | First-failure structural checks via [`validate_fields`] |
//! | [`digest`] | SHA-256 content and salted digests |
//! | [`render`] | Deep human-readable dumps for debugging |
//! | [`signing`] | The external signer seam ([`Signer`], [`Ed25519Signer`]) |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use bftx::{validate_report, Transaction};
//!
//! let tx = Transaction::from_path("bill_of_lading.json")?;
//! match validate_report(&tx) {
//!     Ok(ok) => println!("{ok}"),
//!     Err(report) => eprintln!("{}\n{report}", report.diagnostic()),
//! }
//! println!("{}", tx.state());
//! ```

pub mod digest;
pub mod document;
pub mod render;
pub mod signing;
pub mod types;
pub mod validation;

pub use digest::{content_digest, salted_digest, Digest};
pub use document::DocumentError;
pub use signing::{
    sign_transaction, verify_transaction, Ed25519Signer, ProofError, Signer, SignerHandle,
    SigningError,
};
pub use types::{LifecycleState, Property, Transaction};
pub use validation::{validate_fields, validate_report, FieldError, ValidationReport};
