//! SHA-256 content digests of a [`Transaction`].
//!
//! The digest input is the JCS canonical JSON (RFC 8785) of the transaction:
//! sorted keys, no insignificant whitespace. Every serialised attribute,
//! process attributes included, feeds the hash; the signer handle is never
//! serialised and so never does.

use sha2::{Digest as _, Sha256};

use crate::document::DocumentError;
use crate::types::Transaction;

/// A 32-byte SHA-256 output.
pub type Digest = [u8; 32];

/// Hash the current content of `tx`.
///
/// Deterministic for identical content. Fails only if the transaction cannot
/// be encoded, which the model's types rule out in practice.
pub fn content_digest(tx: &Transaction) -> Result<Digest, DocumentError> {
    Ok(Sha256::digest(canonical_bytes(tx)?).into())
}

/// Hash `hash || salt`.
pub fn salted_digest(hash: &[u8], salt: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(hash);
    hasher.update(salt);
    hasher.finalize().into()
}

/// Lowercase hex form of a digest, for display.
pub fn to_hex(digest: &[u8]) -> String {
    hex::encode(digest)
}

fn canonical_bytes(tx: &Transaction) -> Result<Vec<u8>, DocumentError> {
    let value = serde_json::to_value(tx).map_err(DocumentError::Encode)?;
    serde_jcs::to_vec(&value).map_err(DocumentError::Encode)
}
