use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::payload::{coerce_str, json_type_name, LogPayload};

/// One chat message flattened for tabular export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRow {
    pub timestamp: String,
    pub sender: String,
    pub text: String,
}

impl MessageRow {
    /// Build a row from one entry of the `messages` sequence. Non-mapping
    /// entries yield `None` and are dropped by the caller. Missing fields
    /// default to the empty string.
    fn from_entry(entry: &Value) -> Option<Self> {
        let map = entry.as_object()?;
        let field = |name: &str| map.get(name).map(coerce_str).unwrap_or_default();
        Some(Self {
            timestamp: field("timestamp"),
            sender: field("sender"),
            text: field("text"),
        })
    }
}

/// Outcome of screening a payload's `messages` field.
///
/// The batch loop branches on this tag: `Rows` is written out, `Skip`
/// produces a notice and no output for that log.
#[derive(Debug)]
pub enum MessageScan {
    /// Rows extracted and sorted, ready to write (possibly empty).
    Rows(Vec<MessageRow>),
    /// The field exists with the wrong shape; the whole log is skipped.
    Skip(String),
}

/// Extract and sort the message rows of one log.
///
/// An absent `messages` field is an empty sequence; a present one that is
/// not a sequence skips the log. Rows sort by timestamp ascending; rows
/// without a genuine numeric timestamp sort after all numeric rows, keeping
/// their original relative order (the sort is stable).
pub fn scan_messages(payload: &LogPayload) -> MessageScan {
    let entries: &[Value] = match payload.get("messages") {
        None => &[],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(other) => {
            return MessageScan::Skip(format!(
                "'messages' is not a list (found {})",
                json_type_name(other)
            ))
        }
    };

    let mut keyed: Vec<(f64, MessageRow)> = entries
        .iter()
        .filter_map(|entry| MessageRow::from_entry(entry).map(|row| (timestamp_key(entry), row)))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    MessageScan::Rows(keyed.into_iter().map(|(_, row)| row).collect())
}

/// Sort key for one message entry. Only genuine JSON numbers order by
/// value; missing, null, string, and other timestamps sort as +inf.
fn timestamp_key(entry: &Value) -> f64 {
    entry
        .get("timestamp")
        .and_then(Value::as_f64)
        .unwrap_or(f64::INFINITY)
}

/// Write rows as a CSV with header `timestamp,sender,text`. The header is
/// written even when there are no rows.
pub fn write_messages_csv(rows: &[MessageRow], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(["timestamp", "sender", "text"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn payload_with_messages(messages: Value) -> LogPayload {
        let raw = json!({ "id": "p1", "messages": messages }).to_string();
        LogPayload::parse(&raw, Path::new("p1.txt")).unwrap()
    }

    fn rows(scan: MessageScan) -> Vec<MessageRow> {
        match scan {
            MessageScan::Rows(rows) => rows,
            MessageScan::Skip(reason) => panic!("unexpected skip: {reason}"),
        }
    }

    #[test]
    fn test_non_mapping_entries_dropped() {
        let payload = payload_with_messages(json!([
            {"timestamp": 1, "sender": "user", "text": "hi"},
            "stray string",
            42,
            {"timestamp": 2, "sender": "chatbot", "text": "hello"},
        ]));
        let rows = rows(scan_messages(&payload));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "hi");
        assert_eq!(rows[1].text, "hello");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let payload = payload_with_messages(json!([{}]));
        let rows = rows(scan_messages(&payload));
        assert_eq!(
            rows[0],
            MessageRow {
                timestamp: String::new(),
                sender: String::new(),
                text: String::new(),
            }
        );
    }

    #[test]
    fn test_sort_puts_non_numeric_timestamps_last() {
        // Timestamps [5, "", 2, null, 1] must come out as [1, 2, 5, "", null]
        let payload = payload_with_messages(json!([
            {"timestamp": 5, "text": "e"},
            {"timestamp": "", "text": "blank"},
            {"timestamp": 2, "text": "b"},
            {"timestamp": null, "text": "none"},
            {"timestamp": 1, "text": "a"},
        ]));
        let rows = rows(scan_messages(&payload));
        let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "e", "blank", "none"]);
    }

    #[test]
    fn test_numeric_string_timestamps_sort_as_missing() {
        let payload = payload_with_messages(json!([
            {"timestamp": "2", "text": "stringy"},
            {"timestamp": 9, "text": "numeric"},
        ]));
        let rows = rows(scan_messages(&payload));
        assert_eq!(rows[0].text, "numeric");
        assert_eq!(rows[1].text, "stringy");
        assert_eq!(rows[1].timestamp, "2");
    }

    #[test]
    fn test_absent_messages_is_empty() {
        let payload = LogPayload::parse("{\"id\": \"p1\"}", Path::new("p1.txt")).unwrap();
        assert!(rows(scan_messages(&payload)).is_empty());
    }

    #[test]
    fn test_wrong_type_messages_skips() {
        let payload = payload_with_messages(json!("not a list"));
        match scan_messages(&payload) {
            MessageScan::Skip(reason) => {
                assert!(reason.contains("not a list"));
                assert!(reason.contains("string"));
            }
            MessageScan::Rows(_) => panic!("expected skip"),
        }

        // Null counts as present-with-wrong-shape, not absent.
        let payload = payload_with_messages(json!(null));
        assert!(matches!(scan_messages(&payload), MessageScan::Skip(_)));
    }

    #[test]
    fn test_number_timestamp_renders_as_plain_string() {
        let payload = payload_with_messages(json!([
            {"timestamp": 12345, "sender": "user", "text": "hi"},
        ]));
        let rows = rows(scan_messages(&payload));
        assert_eq!(rows[0].timestamp, "12345");
    }
}
