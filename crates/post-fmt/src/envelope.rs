//! Historical envelope shapes and their ordered classification.
//!
//! Each shape is a typed schema; classification is a deserialization attempt
//! against each candidate in priority order, first match wins. This replaces
//! the ad hoc field sniffing the formats accreted over time.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Literal `"wallt4"` value of the nested envelope's `protocol` field.
///
/// Deserialization fails on any other value, which is what makes the typed
/// classification attempt below reject non-wallt4 objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolMarker {
    /// The wallt4 protocol identifier.
    #[serde(rename = "wallt4")]
    Wallt4,
}

/// Literal `"wallt4"` value of the legacy flat envelope's `app` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMarker {
    /// The wallt4 app identifier.
    #[serde(rename = "wallt4")]
    Wallt4,
}

/// Content fields shared by both wallt4 envelope shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFields {
    /// Post title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Post body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Attached image: data URI, URL, or bare base64.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Free-form content type label (e.g. "Article").
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Embedded timestamp in whatever unit the writer chose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    /// Whether the content was published encrypted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,

    /// Declared audience tier, meaningful only when `encrypted` is set.
    #[serde(rename = "encryptionLevel", skip_serializing_if = "Option::is_none")]
    pub encryption_level: Option<u8>,
}

/// Nested wallt4 envelope: `{"protocol":"wallt4","version":n,"data":{..}}`.
///
/// Early writers put the content fields directly on the envelope object
/// instead of under `data`; both layouts are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallt4Envelope {
    /// Protocol marker, always `"wallt4"`.
    pub protocol: ProtocolMarker,

    /// Envelope format version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Content fields, when nested under `data`. A `data` value that is not
    /// a usable object is treated as absent so the envelope's own fields
    /// still apply.
    #[serde(
        default,
        deserialize_with = "lenient_fields",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<PostFields>,

    /// Content fields placed directly on the envelope object.
    #[serde(flatten)]
    pub inline: PostFields,
}

impl Wallt4Envelope {
    /// Canonical content fields: `data` when present, else the envelope
    /// object itself.
    pub fn fields(&self) -> &PostFields {
        self.data.as_ref().unwrap_or(&self.inline)
    }
}

fn lenient_fields<'de, D>(deserializer: D) -> Result<Option<PostFields>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Legacy flat envelope: `{"app":"wallt4","title":..,"content":..,..}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyFlatEnvelope {
    /// App marker, always `"wallt4"`.
    pub app: AppMarker,

    /// Post title.
    pub title: String,

    /// Post body.
    pub content: String,

    /// Attached image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Free-form content type label.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Embedded timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Minimal schema gating the untyped-article classification: any JSON object
/// with string `title` and `content` fields but no protocol/app marker.
#[derive(Debug, Clone, Deserialize)]
pub struct GenericArticle {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
}

/// A classified content envelope. Exactly one variant per decode attempt.
#[derive(Debug, Clone)]
pub enum ContentEnvelope {
    /// Nested wallt4 envelope (rule 1).
    Wallt4(Wallt4Envelope),
    /// Legacy flat wallt4 envelope (rule 2).
    LegacyFlat(LegacyFlatEnvelope),
    /// Untyped article: well-formed JSON with title/content (rule 3).
    GenericJson(Value),
    /// Anything else (rule 4), or a payload that was never JSON.
    PlainText(String),
}

impl ContentEnvelope {
    /// Classifies a parsed JSON value, first match wins.
    pub fn classify(value: Value) -> Self {
        if let Ok(env) = serde_json::from_value::<Wallt4Envelope>(value.clone()) {
            return Self::Wallt4(env);
        }
        if let Ok(env) = serde_json::from_value::<LegacyFlatEnvelope>(value.clone()) {
            return Self::LegacyFlat(env);
        }
        if serde_json::from_value::<GenericArticle>(value.clone()).is_ok() {
            return Self::GenericJson(value);
        }
        Self::PlainText(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_wallt4_classified_first() {
        let value = json!({
            "protocol": "wallt4",
            "version": 2,
            "data": {"title": "t", "content": "c", "type": "Article", "timestamp": 1700000000}
        });
        match ContentEnvelope::classify(value) {
            ContentEnvelope::Wallt4(env) => {
                assert_eq!(env.fields().title.as_deref(), Some("t"));
                assert_eq!(env.version, Some(2));
            }
            other => panic!("expected wallt4, got {other:?}"),
        }
    }

    #[test]
    fn inline_fields_without_data_object() {
        let value = json!({"protocol": "wallt4", "title": "t", "content": "c"});
        match ContentEnvelope::classify(value) {
            ContentEnvelope::Wallt4(env) => {
                assert!(env.data.is_none());
                assert_eq!(env.fields().content.as_deref(), Some("c"));
            }
            other => panic!("expected wallt4, got {other:?}"),
        }
    }

    #[test]
    fn non_object_data_falls_back_to_inline_fields() {
        let value = json!({
            "protocol": "wallt4",
            "data": "not an object",
            "title": "t",
            "content": "c"
        });
        match ContentEnvelope::classify(value) {
            ContentEnvelope::Wallt4(env) => {
                assert!(env.data.is_none());
                assert_eq!(env.fields().title.as_deref(), Some("t"));
            }
            other => panic!("expected wallt4, got {other:?}"),
        }
    }

    #[test]
    fn legacy_flat_envelope() {
        let value = json!({"app": "wallt4", "title": "t", "content": "c", "timestamp": 1.0});
        assert!(matches!(
            ContentEnvelope::classify(value),
            ContentEnvelope::LegacyFlat(_)
        ));
    }

    #[test]
    fn protocol_marker_beats_app_marker() {
        let value = json!({
            "protocol": "wallt4",
            "app": "wallt4",
            "title": "t",
            "content": "c"
        });
        assert!(matches!(
            ContentEnvelope::classify(value),
            ContentEnvelope::Wallt4(_)
        ));
    }

    #[test]
    fn unmarked_article_is_generic() {
        let value = json!({"title": "t", "content": "c", "author": "a"});
        assert!(matches!(
            ContentEnvelope::classify(value),
            ContentEnvelope::GenericJson(_)
        ));
    }

    #[test]
    fn unrecognized_object_is_plain_text() {
        let value = json!({"foo": 1});
        assert!(matches!(
            ContentEnvelope::classify(value),
            ContentEnvelope::PlainText(_)
        ));
    }

    #[test]
    fn wrong_marker_value_rejected() {
        let value = json!({"protocol": "ord", "title": "t", "content": "c"});
        assert!(matches!(
            ContentEnvelope::classify(value),
            ContentEnvelope::GenericJson(_)
        ));
    }

    #[test]
    fn nested_envelope_roundtrips() {
        let raw = r#"{"protocol":"wallt4","version":1,"data":{"title":"t","content":"c","type":"Article","timestamp":1700000000.0,"encrypted":true,"encryptionLevel":3}}"#;
        let env: Wallt4Envelope = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_string(&env).unwrap();
        let reparsed: Value = serde_json::from_str(&back).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn legacy_envelope_roundtrips() {
        let raw = r#"{"app":"wallt4","title":"t","content":"c","image":"https://x/y.png","type":"Article","timestamp":1700000000.0}"#;
        let env: LegacyFlatEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&env).unwrap(), raw);
    }
}
