//! Core data types for the Blockfreight transaction (BF_TX).
//!
//! A [`Transaction`] is a bill-of-lading document plus a handful of process
//! attributes recording how far it has travelled through signing and
//! transmission. The document half is a fixed tree of property groups; every
//! leaf is an object whose `Type` member holds the actual value:
//!
//! ```json
//! { "Properties": { "BolNum": { "Type": 100045 }, "Shipper": { "Type": "Acme" } } }
//! ```
//!
//! Leaf kinds are carried by the Rust types ([`Property<String>`] versus
//! [`Property<i64>`]), so a value of the wrong kind never makes it past
//! decoding. All JSON keys are PascalCase.

use serde::{Deserialize, Serialize};

use crate::signing::SignerHandle;

/// A single leaf of the property tree. Serialises as `{ "Type": <value> }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Property<T> {
    #[serde(rename = "Type", default, deserialize_with = "null_as_default")]
    pub value: T,
}

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

/// A string-valued leaf.
pub type TextProperty = Property<String>;

/// An integer-valued leaf. Zero means "unset".
pub type NumberProperty = Property<i64>;

/// A date leaf: an integer date plus the format it is written in
/// (e.g. `20170930` with `"YYYYMMDD"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DateProperty {
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub value: i64,
    #[serde(rename = "Format", deserialize_with = "null_as_default")]
    pub format: String,
}

/// A property group with its own `Type` string and a nested sub-record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound(deserialize = "P: Deserialize<'de> + Default"))]
pub struct Composite<P> {
    #[serde(rename = "Type", default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(rename = "Properties", default, deserialize_with = "null_as_default")]
    pub properties: P,
}

/// Where and when the bill of lading was issued.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct IssueDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub place_of_issue: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub date_of_issue: DateProperty,
}

/// Name and signature placeholder of a signing party
/// (the master, or the agent acting for the master).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Signatory {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub sig: TextProperty,
}

/// The agent acting for the owner, who also states the conditions of carriage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct OwnerAgent {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub sig: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub conditions_for_carriage: TextProperty,
}

/// The bill-of-lading attribute tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Properties {
    #[serde(deserialize_with = "null_as_default")]
    pub shipper: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub bol_num: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub ref_num: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub consignee: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub vessel: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub port_of_loading: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub port_of_discharge: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub notify_address: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub desc_of_goods: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub gross_weight: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub freight_payable_amt: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub freight_adv_amt: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub general_instructions: TextProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub date_shipped: DateProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub issue_details: Composite<IssueDetails>,
    #[serde(deserialize_with = "null_as_default")]
    pub num_bol: NumberProperty,
    #[serde(deserialize_with = "null_as_default")]
    pub master_info: Composite<Signatory>,
    #[serde(deserialize_with = "null_as_default")]
    pub agent_for_master: Composite<Signatory>,
    #[serde(deserialize_with = "null_as_default")]
    pub agent_for_owner: Composite<OwnerAgent>,
}

/// A Blockfreight transaction: one freight document plus its process state.
///
/// Created by decoding a document (see [`Transaction::from_slice`]), mutated
/// by an external signer and transmitter, and cleared for reuse with
/// [`Transaction::reset`]. The type has no internal state machine; callers
/// are expected to validate before transmitting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Transaction {
    // --- bill of lading ---
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub doc_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub properties: Properties,

    // --- process attributes ---
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    /// Reference to the external signer that produced `signature`.
    /// Never serialised and never part of the content digest.
    #[serde(skip)]
    pub signer: Option<SignerHandle>,

    /// Digest that was signed, hex-encoded on the wire.
    #[serde(with = "hex_bytes")]
    pub signhash: Vec<u8>,
    #[serde(deserialize_with = "null_as_default")]
    pub signature: String,
    #[serde(deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub transmitted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub amendment: String,
}

/// Coarse progress of a transaction, derived from `verified` and
/// `transmitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Constructed,
    Signed,
    Transmitted,
}

/// Formats the state the way it is reported to users (e.g. `"Signed!"`).
impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Constructed => write!(f, "Constructed!"),
            LifecycleState::Signed => write!(f, "Signed!"),
            LifecycleState::Transmitted => write!(f, "Transmitted!"),
        }
    }
}

impl Transaction {
    /// Current lifecycle state. `transmitted` takes precedence over
    /// `verified`.
    pub fn state(&self) -> LifecycleState {
        if self.transmitted {
            LifecycleState::Transmitted
        } else if self.verified {
            LifecycleState::Signed
        } else {
            LifecycleState::Constructed
        }
    }

    /// Clear the signing and transmission attributes so the same document
    /// can go through the process again. Document attributes, `id` and
    /// `amendment` are left alone.
    pub fn reset(&mut self) {
        self.signer = None;
        self.signhash.clear();
        self.signature.clear();
        self.verified = false;
        self.transmitted = false;
    }

    /// By-value form of [`reset`](Self::reset).
    pub fn reinitialized(mut self) -> Self {
        self.reset();
        self
    }
}

/// Decode `null` the same as a missing key: the type's default.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    // `null` and a missing key both decode to an empty hash.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(d)?.unwrap_or_default();
        hex::decode(encoded).map_err(serde::de::Error::custom)
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../tests/fixtures/bftx.json");

    fn fixture() -> Transaction {
        serde_json::from_str(FIXTURE).unwrap()
    }

    #[test]
    fn decodes_pascal_case_tree() {
        let tx = fixture();
        assert_eq!(tx.doc_type, "object");
        assert_eq!(tx.properties.bol_num.value, 100045);
        assert_eq!(tx.properties.date_shipped.format, "YYYYMMDD");
        assert_eq!(
            tx.properties.issue_details.properties.place_of_issue.value,
            "Melbourne"
        );
        assert_eq!(
            tx.properties
                .agent_for_owner
                .properties
                .conditions_for_carriage
                .value,
            "Carried under the carrier's standard terms."
        );
        assert_eq!(tx.id, "BFTX-2017-0001");
        assert!(tx.signhash.is_empty());
        assert!(tx.signer.is_none());
    }

    #[test]
    fn missing_keys_take_defaults_and_unknown_keys_are_ignored() {
        let json = r#"{ "Properties": { "Vessel": { "Type": 12 } }, "Cargo": "ignored" }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.properties.vessel.value, 12);
        assert_eq!(tx.properties.bol_num.value, 0);
        assert_eq!(tx.properties.shipper.value, "");
        assert!(!tx.verified);
    }

    #[test]
    fn wrong_leaf_kind_fails_to_decode() {
        let json = r#"{ "Properties": { "BolNum": { "Type": "one hundred" } } }"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn null_signhash_decodes_as_empty() {
        let json = r#"{ "Signhash": null }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert!(tx.signhash.is_empty());
    }

    #[test]
    fn null_values_decode_as_defaults() {
        let json = r#"{
            "Type": null,
            "Properties": {
                "Shipper": { "Type": null },
                "Vessel": null,
                "DateShipped": { "Type": null, "Format": null },
                "IssueDetails": { "Type": null, "Properties": null },
                "MasterInfo": null
            },
            "Verified": null,
            "Transmitted": null,
            "Signature": null
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx, Transaction::default());

        let json = r#"{ "Properties": null, "Id": null, "Amendment": null }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx, Transaction::default());
    }

    #[test]
    fn null_leaf_keeps_its_siblings() {
        let json = r#"{ "Properties": { "Shipper": { "Type": null }, "BolNum": { "Type": 7 } } }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.properties.shipper.value, "");
        assert_eq!(tx.properties.bol_num.value, 7);
    }

    #[test]
    fn signhash_is_hex_on_the_wire() {
        let mut tx = fixture();
        tx.signhash = vec![0xde, 0xad, 0xbe, 0xef];
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["Signhash"], "deadbeef");
    }

    #[test]
    fn lifecycle_state_table() {
        let cases = [
            (true, true, "Transmitted!"),
            (true, false, "Transmitted!"),
            (false, true, "Signed!"),
            (false, false, "Constructed!"),
        ];
        for (transmitted, verified, expected) in cases {
            let mut tx = fixture();
            tx.transmitted = transmitted;
            tx.verified = verified;
            assert_eq!(tx.state().to_string(), expected);
        }
    }

    #[test]
    fn reset_clears_process_attributes_only() {
        let original = fixture();
        let mut tx = original.clone();
        tx.signer = Some(SignerHandle::new("did:key:z6MkTest"));
        tx.signhash = vec![1, 2, 3];
        tx.signature = "zSig".into();
        tx.verified = true;
        tx.transmitted = true;

        tx.reset();
        assert_eq!(tx, original);
        assert_eq!(tx.state(), LifecycleState::Constructed);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut tx = fixture();
        tx.signature = "zSig".into();
        tx.verified = true;
        let once = tx.clone().reinitialized();
        let twice = once.clone().reinitialized();
        assert_eq!(once, twice);
    }
}
