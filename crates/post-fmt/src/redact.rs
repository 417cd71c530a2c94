//! Preview redaction: bounds oversized strings in decoded values for safe
//! display. Shares the format-sniffing heuristics with the image field
//! normalization; it never touches decryption or script parsing.

use serde_json::Value;

use crate::sniff::{is_data_image_uri, looks_like_base64};

/// Base64-looking strings longer than this become a placeholder.
const BASE64_PLACEHOLDER_LEN: usize = 256;

/// Other strings longer than this are truncated head/tail.
const TRUNCATE_LEN: usize = 600;

/// Bytes of head kept when truncating.
const HEAD_LEN: usize = 300;

/// Bytes of tail kept when truncating.
const TAIL_LEN: usize = 100;

/// Returns a structurally identical value with long strings shortened.
///
/// Object and array shape is preserved; non-string values pass through
/// unchanged. Image data URIs and long base64 blobs become length-only
/// placeholders, and any other overlong string keeps its head and tail with
/// a byte-count gap note in the middle.
pub fn redact_for_preview(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact_string(s)),
        Value::Array(items) => Value::Array(items.iter().map(redact_for_preview).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| (key.clone(), redact_for_preview(val)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn redact_string(s: &str) -> String {
    if is_data_image_uri(s) {
        return format!("[data:image URI, {} chars]", s.len());
    }
    if s.len() > BASE64_PLACEHOLDER_LEN && looks_like_base64(s) {
        return format!("[base64 data, {} chars]", s.len());
    }
    if s.len() > TRUNCATE_LEN {
        let head_end = floor_char_boundary(s, HEAD_LEN);
        let tail_start = ceil_char_boundary(s, s.len() - TAIL_LEN);
        let omitted = tail_start - head_end;
        return format!(
            "{} ... [{omitted} bytes omitted] ... {}",
            &s[..head_end],
            &s[tail_start..]
        );
    }
    s.to_owned()
}

fn floor_char_boundary(s: &str, mut at: usize) -> usize {
    while !s.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn ceil_char_boundary(s: &str, mut at: usize) -> usize {
    while !s.is_char_boundary(at) {
        at += 1;
    }
    at
}
