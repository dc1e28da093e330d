use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::payload::{coerce_str, LogPayload};

/// Final submitted editor content as raw HTML.
///
/// The `editor` field holds a sequence of snapshots; the last one is the
/// content at submit time. An absent, non-sequence, or empty field yields
/// an empty string, as does a final snapshot that is not a mapping.
pub fn final_editor_html(payload: &LogPayload) -> String {
    let Some(snapshots) = payload.get("editor").and_then(Value::as_array) else {
        return String::new();
    };
    match snapshots.last() {
        Some(Value::Object(snapshot)) => snapshot.get("text").map(coerce_str).unwrap_or_default(),
        _ => String::new(),
    }
}

static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\b[^>]*>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Convert rich-editor HTML into plain text.
///
/// `<br>` elements become literal newlines before any tags are stripped, so
/// the editor's line semantics survive. All other tags are dropped without
/// inserting whitespace. Entities are decoded after stripping, so escaped
/// markup like `&lt;b&gt;` remains literal text. CRLF is normalized and the
/// result trimmed.
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let with_breaks = BR_RE.replace_all(html, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());
    decoded.replace("\r\n", "\n").trim().to_string()
}
