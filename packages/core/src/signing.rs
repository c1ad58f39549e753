//! The external signer seam.
//!
//! Key material never lives inside a [`Transaction`]. A [`Signer`] owns the
//! key and the transaction only records a [`SignerHandle`] naming who signed.
//! Signing covers the content digest of the transaction with its process
//! attributes reset, so the stored `signhash`, `signature` and `verified`
//! flag do not feed back into what was signed.
//!
//! [`Ed25519Signer`] identifies itself by `did:key` and encodes signatures as
//! base58btc with a `z` multibase prefix.

use ed25519_dalek::{Signer as _, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;

use crate::digest::content_digest;
use crate::document::DocumentError;
use crate::types::Transaction;

/// Opaque reference to the signer that produced a transaction's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerHandle(String);

impl SignerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A capability that can sign on behalf of some identity.
pub trait Signer {
    /// Public identifier recorded on the transaction.
    fn handle(&self) -> SignerHandle;

    /// Raw signature bytes over `message`.
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// An Ed25519 key held outside the transaction.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Restore a signer from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl Signer for Ed25519Signer {
    /// `did:key:z…` from the multicodec Ed25519 prefix `[0xed, 0x01]`.
    fn handle(&self) -> SignerHandle {
        let mut multicodec = vec![0xed_u8, 0x01];
        multicodec.extend_from_slice(&self.verifying_key().to_bytes());
        SignerHandle::new(format!("did:key:z{}", bs58::encode(multicodec).into_string()))
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

/// Errors returned by [`sign_transaction`].
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("transaction is already signed; reset it before re-signing")]
    AlreadySigned,
    #[error("could not digest transaction: {0}")]
    Digest(#[from] DocumentError),
}

/// Errors returned by [`verify_transaction`].
#[derive(Debug, Error)]
pub enum ProofError {
    #[error("transaction has no signature")]
    ProofMissing,
    #[error("signhash does not match the transaction content")]
    HashMismatch,
    #[error("signature decoding failed: {0}")]
    DecodingFailed(String),
    #[error("signature verification failed")]
    VerificationFailed,
    #[error("could not digest transaction: {0}")]
    Digest(#[from] DocumentError),
}

/// Sign `tx` in place with `signer`.
///
/// Populates `signhash`, `signature` and `signer`, and sets `verified`.
///
/// # Errors
///
/// Returns [`SigningError::AlreadySigned`] if `tx` is already verified.
pub fn sign_transaction(tx: &mut Transaction, signer: &dyn Signer) -> Result<(), SigningError> {
    if tx.verified {
        return Err(SigningError::AlreadySigned);
    }

    let digest = signed_digest(tx)?;
    let signature = signer.sign(&digest);
    let handle = signer.handle();

    tx.signhash = digest.to_vec();
    tx.signature = format!("z{}", bs58::encode(signature).into_string());
    tracing::info!(id = %tx.id, signer = %handle, "signed BF_TX");
    tx.signer = Some(handle);
    tx.verified = true;
    Ok(())
}

/// Check that `tx.signhash` matches the transaction content and that
/// `tx.signature` is a valid Ed25519 signature over it by `key`.
pub fn verify_transaction(tx: &Transaction, key: &VerifyingKey) -> Result<(), ProofError> {
    if tx.signature.is_empty() {
        return Err(ProofError::ProofMissing);
    }

    let digest = signed_digest(tx)?;
    if tx.signhash != digest {
        return Err(ProofError::HashMismatch);
    }

    let encoded = tx
        .signature
        .strip_prefix('z')
        .ok_or_else(|| ProofError::DecodingFailed("signature must start with 'z'".into()))?;
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| ProofError::DecodingFailed(format!("bs58 decode failed: {e}")))?;
    let bytes: [u8; 64] = bytes
        .try_into()
        .map_err(|_| ProofError::DecodingFailed("signature must be exactly 64 bytes".into()))?;

    key.verify(&digest, &ed25519_dalek::Signature::from_bytes(&bytes))
        .map_err(|_| ProofError::VerificationFailed)
}

fn signed_digest(tx: &Transaction) -> Result<[u8; 32], DocumentError> {
    content_digest(&tx.clone().reinitialized())
}
