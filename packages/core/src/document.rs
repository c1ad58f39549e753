//! Loading and serialising the JSON document form of a [`Transaction`].
//!
//! Decoding follows serde's usual rules for this model: unknown keys are
//! ignored and missing or `null` keys keep their default (empty or zero)
//! value. Object keys are matched case-insensitively, so `bolNum` or
//! `BOLNUM` reach the `BolNum` field; an exact-case key wins over a folded
//! one. A leaf holding a value of the wrong JSON kind is a
//! [`DocumentError::Decode`]; the structural checks proper live in
//! [`crate::validation`].

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::Transaction;

/// Errors returned while reading or writing a transaction document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document does not decode as a BF_TX: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode BF_TX: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Transaction {
    /// Decode a transaction from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(bytes).map_err(DocumentError::Decode)?;
        let tx: Transaction =
            serde_json::from_value(fold_keys(value)).map_err(DocumentError::Decode)?;
        tracing::debug!(id = %tx.id, "decoded BF_TX document");
        Ok(tx)
    }

    /// Decode a transaction from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Self::from_slice(json.as_bytes())
    }

    /// Read and decode the document at `path`.
    ///
    /// Not-found and permission failures surface as [`DocumentError::Io`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read BF_TX document");
        Self::from_slice(&bytes)
    }

    /// Compact JSON rendering, including the process attributes.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Encode)
    }

    /// Indented JSON rendering, including the process attributes.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Encode)
    }
}

/// Every key the document form uses, in its serialised case.
const KEYS: &[&str] = &[
    "Type",
    "Format",
    "Properties",
    "Shipper",
    "BolNum",
    "RefNum",
    "Consignee",
    "Vessel",
    "PortOfLoading",
    "PortOfDischarge",
    "NotifyAddress",
    "DescOfGoods",
    "GrossWeight",
    "FreightPayableAmt",
    "FreightAdvAmt",
    "GeneralInstructions",
    "DateShipped",
    "IssueDetails",
    "PlaceOfIssue",
    "DateOfIssue",
    "NumBol",
    "MasterInfo",
    "AgentForMaster",
    "AgentForOwner",
    "FirstName",
    "LastName",
    "Sig",
    "ConditionsForCarriage",
    "Id",
    "Signhash",
    "Signature",
    "Verified",
    "Transmitted",
    "Amendment",
];

/// Rewrite object keys that match a known key ignoring ASCII case to that
/// key's serialised spelling. Unknown keys pass through untouched.
fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut folded = Map::new();
            let mut exact = Vec::new();
            for (key, item) in map {
                let item = fold_keys(item);
                match KEYS.iter().find(|known| known.eq_ignore_ascii_case(&key)) {
                    Some(known) if *known == key => exact.push((key, item)),
                    Some(known) => {
                        folded.insert((*known).to_owned(), item);
                    }
                    None => {
                        folded.insert(key, item);
                    }
                }
            }
            folded.extend(exact);
            Value::Object(folded)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}
