//! Shared format-sniffing heuristics for image fields and preview redaction.

/// Bare base64 strings longer than this are assumed to be image data.
const BASE64_IMAGE_MIN_LEN: usize = 128;

pub(crate) fn is_data_image_uri(s: &str) -> bool {
    s.starts_with("data:image/")
}

pub(crate) fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// True when the string consists only of base64 alphabet characters.
pub(crate) fn looks_like_base64(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}

/// Normalizes an envelope image field for display.
///
/// Full `data:image/...` URIs and `http(s)://` URLs pass unchanged; a long
/// bare base64 string is wrapped as a PNG data URI; anything else is treated
/// as absent.
pub fn normalize_image_url(raw: &str) -> Option<String> {
    if is_data_image_uri(raw) || is_http_url(raw) {
        return Some(raw.to_owned());
    }
    if raw.len() > BASE64_IMAGE_MIN_LEN && looks_like_base64(raw) {
        return Some(format!("data:image/png;base64,{raw}"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uris_and_urls_pass_unchanged() {
        let uri = "data:image/jpeg;base64,AAAA";
        assert_eq!(normalize_image_url(uri).as_deref(), Some(uri));
        let url = "https://example.com/pic.png";
        assert_eq!(normalize_image_url(url).as_deref(), Some(url));
    }

    #[test]
    fn long_base64_gets_wrapped() {
        let raw = "A".repeat(200);
        let normalized = normalize_image_url(&raw).unwrap();
        assert_eq!(normalized, format!("data:image/png;base64,{raw}"));
    }

    #[test]
    fn short_or_odd_strings_are_absent() {
        assert_eq!(normalize_image_url("AAAA"), None);
        let not_base64 = format!("{} spaces!", "A".repeat(200));
        assert_eq!(normalize_image_url(&not_base64), None);
    }
}
