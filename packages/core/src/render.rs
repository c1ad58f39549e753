//! Deep human-readable dumps for debugging.
//!
//! [`render_value`] is a generic structured-value renderer; transactions are
//! rendered by going through their JSON value form. The output is for people
//! reading terminals and logs, not a format anything should parse.

use std::io::Write;

use serde_json::Value;

use crate::document::DocumentError;
use crate::types::Transaction;

/// Render any JSON value as an indented tree.
///
/// ```text
/// {
///   BolNum: {
///     Type: 100045
///   },
///   Shipper: {
///     Type: "Blockfreight Logistics Pty Ltd"
///   }
/// }
/// ```
pub fn render_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

/// Render a transaction with a header naming its id and lifecycle state.
pub fn render_transaction(tx: &Transaction) -> Result<String, DocumentError> {
    let value = serde_json::to_value(tx).map_err(DocumentError::Encode)?;

    let id = if tx.id.is_empty() { "(no id)" } else { tx.id.as_str() };
    let header = format!("BF_TX {}  {}", id, tx.state());
    let rule = "─".repeat(header.chars().count());

    let mut out = format!("{header}\n{rule}\n");
    if let Some(signer) = &tx.signer {
        out.push_str(&format!("signer: {signer}\n"));
    }
    out.push_str(&render_value(&value));
    out.push('\n');
    Ok(out)
}

/// Write [`render_transaction`] output to `w`.
pub fn dump(tx: &Transaction, mut w: impl Write) -> std::io::Result<()> {
    let text = render_transaction(tx).map_err(std::io::Error::other)?;
    w.write_all(text.as_bytes())
}

// --- helpers -----------------------------------------------------------------

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&format!("{s:?}")),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                indent(out, depth + 1);
                write_value(out, item, depth + 1);
                close_entry(out, i + 1 == items.len());
            }
            indent(out, depth);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                indent(out, depth + 1);
                out.push_str(key);
                out.push_str(": ");
                write_value(out, item, depth + 1);
                close_entry(out, i + 1 == map.len());
            }
            indent(out, depth);
            out.push('}');
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    out.push_str(&"  ".repeat(depth));
}

fn close_entry(out: &mut String, last: bool) {
    if !last {
        out.push(',');
    }
    out.push('\n');
}

// --- tests -------------------------------------------------------------------
