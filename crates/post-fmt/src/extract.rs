//! Best-effort text and JSON recovery from push-data payloads.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

/// Outcome of content extraction from a decoded payload.
#[derive(Debug, Clone)]
pub enum ExtractedContent {
    /// One balanced JSON object was found and parsed.
    Json(Value),
    /// No parseable JSON object; the whole decoded text.
    Text(String),
}

/// Decodes payload bytes as UTF-8 text, replacing invalid sequences.
pub fn decode_text(payload: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(payload)
}

/// Locates the first balanced JSON object embedded anywhere in `text`.
///
/// Scans from the first `{`, tracking brace depth and whether the scanner is
/// inside a quoted string. Backslash escapes are honored, so an escaped quote
/// inside a string value neither closes the string nor affects depth.
/// Returns the candidate substring including both braces, or `None` when no
/// `{` exists or the object never balances.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut at = start;

    while at < bytes.len() {
        let b = bytes[at];
        if in_string {
            match b {
                // Escape consumes the following byte unconditionally.
                b'\\' => {
                    at += 2;
                    continue;
                }
                b'"' => in_string = false,
                _ => {}
            }
        } else {
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..=at]);
                    }
                }
                _ => {}
            }
        }
        at += 1;
    }

    None
}

/// Extracts content from a decoded payload.
///
/// Attempts to recover exactly one balanced JSON object; any failure falls
/// back to the whole decoded text, never an error.
pub fn extract_content(payload: &[u8]) -> ExtractedContent {
    let text = decode_text(payload);

    let Some(candidate) = find_json_object(&text) else {
        return ExtractedContent::Text(text.into_owned());
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => ExtractedContent::Json(value),
        Err(err) => {
            debug!(%err, "json candidate failed to parse, falling back to text");
            ExtractedContent::Text(text.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_extraction_with_noise() {
        let text = "noise {\"a\":1,\"b\":{\"c\":2}} trailing";
        assert_eq!(find_json_object(text), Some("{\"a\":1,\"b\":{\"c\":2}}"));
    }

    #[test]
    fn escaped_quote_does_not_terminate_early() {
        let text = r#"{"a":"esc\"aped"}"#;
        assert_eq!(find_json_object(text), Some(text));
    }

    #[test]
    fn braces_inside_strings_ignored() {
        let text = r#"{"a":"{not a brace}"}"#;
        assert_eq!(find_json_object(text), Some(text));
    }

    #[test]
    fn no_brace_means_none() {
        assert_eq!(find_json_object("just plain text"), None);
    }

    #[test]
    fn unbalanced_never_returns() {
        assert_eq!(find_json_object("{\"a\": {\"b\": 1}"), None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let payload = [b'h', b'i', 0xff, 0xfe];
        let text = decode_text(&payload);
        assert!(text.starts_with("hi"));
    }

    #[test]
    fn parse_failure_falls_back_to_text() {
        let payload = b"prefix {\"a\": nope} suffix";
        match extract_content(payload) {
            ExtractedContent::Text(text) => assert_eq!(text, "prefix {\"a\": nope} suffix"),
            other => panic!("expected text fallback, got {other:?}"),
        }
    }

    #[test]
    fn object_extracted_from_payload() {
        let payload = b"xx{\"title\":\"t\",\"content\":\"c\"}yy";
        match extract_content(payload) {
            ExtractedContent::Json(value) => {
                assert_eq!(value["title"], "t");
                assert_eq!(value["content"], "c");
            }
            other => panic!("expected json, got {other:?}"),
        }
    }
}
