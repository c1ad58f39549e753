use thiserror::Error;

use crate::types::Transaction;

/// The kind a leaf is declared to hold, as named in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Number,
    DateFormat,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::String => f.pad("string"),
            Kind::Number => f.pad("number"),
            Kind::DateFormat => f.pad("date format"),
        }
    }
}

/// The first leaf of a [`Transaction`] that failed its structural check.
///
/// Displays as `"<dotted-path> is not a <kind>."`, e.g.
/// `"bftx.Properties.BolNum.Type is not a number."`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{path} is not a {kind}.")]
pub struct FieldError {
    pub path: &'static str,
    pub kind: Kind,
}

/// A failed [`validate_report`]: the user-facing diagnostic block plus the
/// underlying [`FieldError`]. Displays as the raw field message only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{error}")]
pub struct ValidationReport {
    diagnostic: String,
    error: FieldError,
}

impl ValidationReport {
    /// Multi-language explanation, ending with the specific field error.
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    pub fn field_error(&self) -> FieldError {
        self.error
    }
}

/// Returned by [`validate_report`] when every leaf passes.
pub const SUCCESS: &str = "Success! [OK]";

const INVALID_STRUCTURE: &str = "
    Blockfreight, Inc. © 2017. Open Source (MIT) License.

    Error [01]:

    Invalid structure in JSON provided. JSON 结构无效.
    Struttura JSON non valido. هيكل JSON صالح. 無効なJSON構造.
    Estructura inválida en el JSON dado.

    support: support@blockfreight.com
";

/// The current value of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafValue<'a> {
    Text(&'a str),
    Number(i64),
}

impl std::fmt::Display for LeafValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeafValue::Text(s) => write!(f, "{s:?}"),
            LeafValue::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Clone, Copy)]
enum Getter {
    Text(fn(&Transaction) -> &str),
    Number(fn(&Transaction) -> i64),
}

/// One row of the validation table: a dotted path, its declared kind, and
/// how to read it from a transaction.
#[derive(Clone, Copy)]
pub struct Leaf {
    pub path: &'static str,
    pub kind: Kind,
    get: Getter,
}

impl Leaf {
    const fn text(path: &'static str, get: fn(&Transaction) -> &str) -> Self {
        Self { path, kind: Kind::String, get: Getter::Text(get) }
    }

    const fn number(path: &'static str, get: fn(&Transaction) -> i64) -> Self {
        Self { path, kind: Kind::Number, get: Getter::Number(get) }
    }

    const fn format(path: &'static str, get: fn(&Transaction) -> &str) -> Self {
        Self { path, kind: Kind::DateFormat, get: Getter::Text(get) }
    }

    pub fn value<'a>(&self, tx: &'a Transaction) -> LeafValue<'a> {
        match self.get {
            Getter::Text(get) => LeafValue::Text(get(tx)),
            Getter::Number(get) => LeafValue::Number(get(tx)),
        }
    }

    /// String kinds are fixed by the model's types, so only the non-zero rule
    /// for numbers is left to check here.
    pub fn check(&self, tx: &Transaction) -> Result<(), FieldError> {
        match self.value(tx) {
            LeafValue::Number(0) => Err(FieldError { path: self.path, kind: self.kind }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaf")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Every checked leaf, in the order they are walked.
pub static LEAVES: [Leaf; 34] = [
    Leaf::text("bftx.Type", |t| t.doc_type.as_str()),
    Leaf::text("bftx.Properties.Shipper.Type", |t| t.properties.shipper.value.as_str()),
    Leaf::number("bftx.Properties.BolNum.Type", |t| t.properties.bol_num.value),
    Leaf::number("bftx.Properties.RefNum.Type", |t| t.properties.ref_num.value),
    Leaf::text("bftx.Properties.Consignee.Type", |t| t.properties.consignee.value.as_str()),
    Leaf::number("bftx.Properties.Vessel.Type", |t| t.properties.vessel.value),
    Leaf::number("bftx.Properties.PortOfLoading.Type", |t| t.properties.port_of_loading.value),
    Leaf::number("bftx.Properties.PortOfDischarge.Type", |t| t.properties.port_of_discharge.value),
    Leaf::text("bftx.Properties.NotifyAddress.Type", |t| t.properties.notify_address.value.as_str()),
    Leaf::text("bftx.Properties.DescOfGoods.Type", |t| t.properties.desc_of_goods.value.as_str()),
    Leaf::number("bftx.Properties.GrossWeight.Type", |t| t.properties.gross_weight.value),
    Leaf::number("bftx.Properties.FreightPayableAmt.Type", |t| {
        t.properties.freight_payable_amt.value
    }),
    Leaf::number("bftx.Properties.FreightAdvAmt.Type", |t| t.properties.freight_adv_amt.value),
    Leaf::text("bftx.Properties.GeneralInstructions.Type", |t| {
        t.properties.general_instructions.value.as_str()
    }),
    Leaf::number("bftx.Properties.DateShipped.Type", |t| t.properties.date_shipped.value),
    Leaf::format("bftx.Properties.DateShipped.Format", |t| t.properties.date_shipped.format.as_str()),
    Leaf::text("bftx.Properties.IssueDetails.Type", |t| t.properties.issue_details.value.as_str()),
    Leaf::text("bftx.Properties.IssueDetails.Properties.PlaceOfIssue.Type", |t| {
        t.properties.issue_details.properties.place_of_issue.value.as_str()
    }),
    Leaf::number("bftx.Properties.IssueDetails.Properties.DateOfIssue.Type", |t| {
        t.properties.issue_details.properties.date_of_issue.value
    }),
    Leaf::format("bftx.Properties.IssueDetails.Properties.DateOfIssue.Format", |t| {
        t.properties.issue_details.properties.date_of_issue.format.as_str()
    }),
    Leaf::number("bftx.Properties.NumBol.Type", |t| t.properties.num_bol.value),
    Leaf::text("bftx.Properties.MasterInfo.Type", |t| t.properties.master_info.value.as_str()),
    Leaf::text("bftx.Properties.MasterInfo.Properties.FirstName.Type", |t| {
        t.properties.master_info.properties.first_name.value.as_str()
    }),
    Leaf::text("bftx.Properties.MasterInfo.Properties.LastName.Type", |t| {
        t.properties.master_info.properties.last_name.value.as_str()
    }),
    Leaf::text("bftx.Properties.MasterInfo.Properties.Sig.Type", |t| {
        t.properties.master_info.properties.sig.value.as_str()
    }),
    Leaf::text("bftx.Properties.AgentForMaster.Type", |t| t.properties.agent_for_master.value.as_str()),
    Leaf::text("bftx.Properties.AgentForMaster.Properties.FirstName.Type", |t| {
        t.properties.agent_for_master.properties.first_name.value.as_str()
    }),
    Leaf::text("bftx.Properties.AgentForMaster.Properties.LastName.Type", |t| {
        t.properties.agent_for_master.properties.last_name.value.as_str()
    }),
    Leaf::text("bftx.Properties.AgentForMaster.Properties.Sig.Type", |t| {
        t.properties.agent_for_master.properties.sig.value.as_str()
    }),
    Leaf::text("bftx.Properties.AgentForOwner.Type", |t| t.properties.agent_for_owner.value.as_str()),
    Leaf::text("bftx.Properties.AgentForOwner.Properties.FirstName.Type", |t| {
        t.properties.agent_for_owner.properties.first_name.value.as_str()
    }),
    Leaf::text("bftx.Properties.AgentForOwner.Properties.LastName.Type", |t| {
        t.properties.agent_for_owner.properties.last_name.value.as_str()
    }),
    Leaf::text("bftx.Properties.AgentForOwner.Properties.Sig.Type", |t| {
        t.properties.agent_for_owner.properties.sig.value.as_str()
    }),
    Leaf::text("bftx.Properties.AgentForOwner.Properties.ConditionsForCarriage.Type", |t| {
        t.properties.agent_for_owner.properties.conditions_for_carriage.value.as_str()
    }),
];

/// Check every leaf of `tx` in table order.
///
/// Returns `Ok(())` if all leaves pass, or the first [`FieldError`]; leaves
/// after the first failure are not looked at.
pub fn validate_fields(tx: &Transaction) -> Result<(), FieldError> {
    let result = LEAVES.iter().try_for_each(|leaf| leaf.check(tx));
    if let Err(e) = &result {
        tracing::debug!(id = %tx.id, path = e.path, "BF_TX failed structural validation");
    }
    result
}

/// [`validate_fields`] with user-facing output.
///
/// Returns [`SUCCESS`] when the transaction is valid. Otherwise the
/// [`ValidationReport`] carries a multi-language diagnostic for display and
/// converts to the raw field message via `Display`.
pub fn validate_report(tx: &Transaction) -> Result<&'static str, ValidationReport> {
    validate_fields(tx).map(|()| SUCCESS).map_err(|error| ValidationReport {
        diagnostic: format!("{INVALID_STRUCTURE}\n    Specific Error [01]:\n    {error}\n"),
        error,
    })
}

/// Dotted paths of every checked leaf, in walk order.
pub fn leaf_paths() -> impl Iterator<Item = &'static str> {
    LEAVES.iter().map(|leaf| leaf.path)
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const FIXTURE: &str = include_str!("../tests/fixtures/bftx.json");

    fn valid() -> Transaction {
        serde_json::from_str(FIXTURE).unwrap()
    }

    #[test]
    fn valid_transaction_passes() {
        assert_eq!(validate_fields(&valid()), Ok(()));
    }

    #[test]
    fn zero_bol_num_is_reported() {
        let mut tx = valid();
        tx.properties.bol_num.value = 0;
        let err = validate_fields(&tx).unwrap_err();
        assert_eq!(err.to_string(), "bftx.Properties.BolNum.Type is not a number.");
    }

    /// Zero the JSON value behind a `bftx.`-rooted leaf path.
    fn zero_at(doc: &mut serde_json::Value, path: &str) {
        let pointer = format!("/{}", path.trim_start_matches("bftx.").replace('.', "/"));
        let slot = doc
            .pointer_mut(&pointer)
            .unwrap_or_else(|| panic!("{pointer} not in fixture"));
        *slot = serde_json::json!(0);
    }

    #[test]
    fn each_number_leaf_is_checked() {
        let numbers: Vec<&Leaf> = LEAVES.iter().filter(|l| l.kind == Kind::Number).collect();
        assert_eq!(numbers.len(), 11);

        let fixture: serde_json::Value = serde_json::from_str(FIXTURE).unwrap();
        for leaf in numbers {
            let mut doc = fixture.clone();
            zero_at(&mut doc, leaf.path);
            let tx: Transaction = serde_json::from_value(doc).unwrap();
            let err = validate_fields(&tx).unwrap_err();
            assert_eq!(err.path, leaf.path);
            assert_eq!(err.kind, Kind::Number);
            assert_eq!(err.to_string(), format!("{} is not a number.", leaf.path));
        }
    }

    #[test]
    fn only_the_earliest_failure_is_reported() {
        let mut tx = valid();
        tx.properties.num_bol.value = 0;
        tx.properties.vessel.value = 0;
        tx.properties.freight_adv_amt.value = 0;
        assert_eq!(
            validate_fields(&tx).unwrap_err().to_string(),
            "bftx.Properties.Vessel.Type is not a number."
        );
    }

    #[test]
    fn empty_strings_pass() {
        let mut tx = valid();
        tx.doc_type.clear();
        tx.properties.shipper.value.clear();
        tx.properties.date_shipped.format.clear();
        tx.properties.agent_for_owner.properties.sig.value.clear();
        assert_eq!(validate_fields(&tx), Ok(()));
    }

    #[test]
    fn negative_numbers_pass() {
        let mut tx = valid();
        tx.properties.ref_num.value = -4;
        assert_eq!(validate_fields(&tx), Ok(()));
    }

    #[test]
    fn default_transaction_fails_on_first_number() {
        let err = validate_fields(&Transaction::default()).unwrap_err();
        assert_eq!(err.path, "bftx.Properties.BolNum.Type");
    }

    #[test]
    fn table_order_and_uniqueness() {
        let paths: Vec<&str> = leaf_paths().collect();
        assert_eq!(paths.len(), 34);
        assert_eq!(paths[0], "bftx.Type");
        assert_eq!(
            paths[33],
            "bftx.Properties.AgentForOwner.Properties.ConditionsForCarriage.Type"
        );
        let unique: HashSet<&str> = paths.iter().copied().collect();
        assert_eq!(unique.len(), paths.len());
    }

    #[test]
    fn leaf_values_read_through_the_table() {
        let tx = valid();
        let shipper = LEAVES
            .iter()
            .find(|l| l.path == "bftx.Properties.Shipper.Type")
            .unwrap();
        assert_eq!(
            shipper.value(&tx),
            LeafValue::Text("Blockfreight Logistics Pty Ltd")
        );
        let format = LEAVES
            .iter()
            .find(|l| l.kind == Kind::DateFormat)
            .unwrap();
        assert_eq!(format.value(&tx), LeafValue::Text("YYYYMMDD"));
    }

    #[test]
    fn report_success() {
        assert_eq!(validate_report(&valid()), Ok(SUCCESS));
    }

    #[test]
    fn report_failure_wraps_raw_message() {
        let mut tx = valid();
        tx.properties.ref_num.value = 0;
        let report = validate_report(&tx).unwrap_err();
        let raw = "bftx.Properties.RefNum.Type is not a number.";
        assert_eq!(report.to_string(), raw);
        assert!(report.diagnostic().contains("Invalid structure in JSON provided."));
        assert!(report.diagnostic().contains("無効なJSON構造"));
        assert!(report
            .diagnostic()
            .contains("Blockfreight, Inc. © 2017. Open Source (MIT) License."));
        assert!(report.diagnostic().contains("support: support@blockfreight.com"));
        assert!(report.diagnostic().contains(raw));
        assert_eq!(report.field_error().kind, Kind::Number);
    }
}
