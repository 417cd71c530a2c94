//! The per-transaction decode pipeline: script hex to canonical post.
//!
//! Strictly forward-flowing and stateless; every malformed-data condition
//! degrades to a best-effort post so that a batch of transactions always
//! yields one post each, never an exception. Safe to call from concurrent
//! workers.

use chrono::Utc;
use serde_json::Value;
use tracing::debug;
use wallt4_script_fmt::{decode_script_hex, extract_push_data};

use crate::crypt::{self, EncryptedEnvelope, KeyHierarchy};
use crate::envelope::ContentEnvelope;
use crate::extract::{ExtractedContent, extract_content};
use crate::level::EncryptionLevel;
use crate::post::{
    InscriptionKind, InteractionCounters, Post, format_timestamp, normalize_timestamp_ms,
};
use crate::sniff::normalize_image_url;
use crate::tx::RawTransaction;

/// Default title for wallt4 posts missing one.
const DEFAULT_WALLT4_TITLE: &str = "Untitled";

/// Default title for untyped JSON posts.
const DEFAULT_GENERIC_TITLE: &str = "Unknown Inscription";

/// Fallback origin when no identity output address exists.
const UNKNOWN_ORIGIN: &str = "unknown";

/// Default content type label for article-like posts.
const DEFAULT_TYPE: &str = "Article";

/// Decodes one raw transaction into the canonical post record.
///
/// Runs the full pipeline: script hex to push data, push data to text/JSON,
/// one decrypt attempt for tier-encrypted envelopes, then classification and
/// normalization. Never fails; see the module docs for the degradation
/// policy.
pub fn decode_transaction(tx: &RawTransaction, keys: &dyn KeyHierarchy) -> Post {
    let script_hex = tx.inscription_script_hex().unwrap_or("");
    let payload = match decode_script_hex(script_hex) {
        Ok(bytes) => extract_push_data(&bytes),
        Err(err) => {
            debug!(txid = %tx.txid, %err, "script hex undecodable, treating payload as empty");
            Vec::new()
        }
    };

    let extracted = extract_content(&payload);

    // Tier-encrypted envelopes get exactly one decrypt attempt before
    // classification; every failure mode leaves them opaque.
    if let ExtractedContent::Json(value) = &extracted {
        if let Ok(env) = serde_json::from_value::<EncryptedEnvelope>(value.clone()) {
            return decode_encrypted(tx, script_hex, &env, keys);
        }
    }

    let envelope = match extracted {
        ExtractedContent::Json(value) => ContentEnvelope::classify(value),
        ExtractedContent::Text(text) => ContentEnvelope::PlainText(text),
    };

    finish(tx, normalize(envelope, script_hex, None))
}

fn decode_encrypted(
    tx: &RawTransaction,
    script_hex: &str,
    env: &EncryptedEnvelope,
    keys: &dyn KeyHierarchy,
) -> Post {
    let declared = EncryptionLevel::try_from(env.encryption_level);

    let plaintext = match declared {
        Ok(level) => match keys.key_segment(level) {
            Some(segment) => match crypt::decrypt_envelope(env, &segment) {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!(txid = %tx.txid, %level, %err, "decrypt failed, leaving envelope opaque");
                    None
                }
            },
            None => {
                debug!(txid = %tx.txid, %level, "no key segment held, leaving envelope opaque");
                None
            }
        },
        Err(err) => {
            debug!(txid = %tx.txid, %err, "declared level out of range, leaving envelope opaque");
            None
        }
    };

    let level = declared.unwrap_or(EncryptionLevel::OwnerOnly);
    match plaintext {
        Some(value) => finish(
            tx,
            normalize(ContentEnvelope::classify(value), script_hex, Some(level)),
        ),
        None => finish(tx, Normalized::opaque(env, level)),
    }
}

/// Envelope fields after classification, before transaction-level
/// derivations are applied.
struct Normalized {
    title: String,
    content: String,
    image: Option<String>,
    type_label: String,
    timestamp: Option<f64>,
    encrypted: bool,
    level: EncryptionLevel,
    kind: InscriptionKind,
}

impl Normalized {
    /// A still-encrypted post: ciphertext retained as opaque content.
    fn opaque(env: &EncryptedEnvelope, level: EncryptionLevel) -> Self {
        Self {
            title: DEFAULT_WALLT4_TITLE.to_owned(),
            content: env.data.clone(),
            image: None,
            type_label: "Encrypted".to_owned(),
            timestamp: None,
            encrypted: true,
            level,
            kind: InscriptionKind::Unknown,
        }
    }
}

fn normalize(
    envelope: ContentEnvelope,
    script_hex: &str,
    decrypted_level: Option<EncryptionLevel>,
) -> Normalized {
    let mut norm = match envelope {
        ContentEnvelope::Wallt4(env) => {
            let fields = env.fields();
            let level = fields
                .encryption_level
                .map(|n| EncryptionLevel::try_from(n).unwrap_or(EncryptionLevel::OwnerOnly))
                .unwrap_or_default();
            Normalized {
                title: fields
                    .title
                    .clone()
                    .unwrap_or_else(|| DEFAULT_WALLT4_TITLE.to_owned()),
                content: fields.content.clone().unwrap_or_default(),
                image: fields.image.clone(),
                type_label: fields
                    .kind
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TYPE.to_owned()),
                timestamp: fields.timestamp,
                encrypted: fields.encrypted.unwrap_or(false),
                level,
                kind: InscriptionKind::Wallt4,
            }
        }
        ContentEnvelope::LegacyFlat(env) => Normalized {
            title: env.title,
            content: env.content,
            image: env.image,
            type_label: env.kind.unwrap_or_else(|| DEFAULT_TYPE.to_owned()),
            timestamp: env.timestamp,
            encrypted: false,
            level: EncryptionLevel::Public,
            kind: InscriptionKind::Wallt4,
        },
        ContentEnvelope::GenericJson(value) => {
            let str_field = |name: &str| {
                value
                    .get(name)
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            };
            Normalized {
                title: str_field("title").unwrap_or_else(|| DEFAULT_GENERIC_TITLE.to_owned()),
                content: str_field("content").unwrap_or_default(),
                image: str_field("image"),
                type_label: str_field("type").unwrap_or_else(|| DEFAULT_TYPE.to_owned()),
                timestamp: value.get("timestamp").and_then(Value::as_f64),
                encrypted: false,
                level: EncryptionLevel::Public,
                kind: InscriptionKind::Json,
            }
        }
        // Nothing recognizable: keep the full script hex so no data is
        // silently dropped.
        ContentEnvelope::PlainText(_) => Normalized {
            title: DEFAULT_GENERIC_TITLE.to_owned(),
            content: script_hex.to_owned(),
            image: None,
            type_label: "Text".to_owned(),
            timestamp: None,
            encrypted: false,
            level: EncryptionLevel::Public,
            kind: InscriptionKind::Text,
        },
    };

    // A decrypted envelope keeps its on-chain encryption state.
    if let Some(level) = decrypted_level {
        norm.encrypted = true;
        norm.level = level;
    }

    norm
}

fn finish(tx: &RawTransaction, norm: Normalized) -> Post {
    // Envelope timestamp, then the transaction's own time, then now.
    let timestamp_ms = norm
        .timestamp
        .map(normalize_timestamp_ms)
        .or_else(|| tx.time.map(|t| t as i64 * 1000))
        .unwrap_or_else(|| Utc::now().timestamp_millis());

    Post {
        id: tx.txid.clone(),
        title: norm.title,
        user: tx
            .origin_address()
            .unwrap_or(UNKNOWN_ORIGIN)
            .to_owned(),
        content: norm.content,
        image_url: norm.image.as_deref().and_then(normalize_image_url),
        kind: norm.type_label,
        timestamp_ms,
        created_at_display: format_timestamp(timestamp_ms),
        encrypted: norm.encrypted,
        encryption_level: norm.level,
        txid: tx.txid.clone(),
        vout: 0,
        size_bytes: tx.size,
        inscription_kind: norm.kind,
        interaction_counters: InteractionCounters::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{ScriptPubKeyInfo, TxOutInfo};

    fn no_keys(_level: EncryptionLevel) -> Option<Vec<u8>> {
        None
    }

    fn tx_with_script_hex(hex_str: &str) -> RawTransaction {
        RawTransaction {
            txid: "aa".repeat(32),
            vout: vec![TxOutInfo {
                script_pub_key: ScriptPubKeyInfo {
                    hex: hex_str.to_owned(),
                    addresses: None,
                },
            }],
            size: 100,
            time: Some(1_700_000_000),
        }
    }

    #[test]
    fn undecodable_hex_degrades_to_text_post() {
        let post = decode_transaction(&tx_with_script_hex("abc"), &no_keys);
        assert_eq!(post.inscription_kind, InscriptionKind::Text);
        assert_eq!(post.content, "abc");
        assert_eq!(post.user, "unknown");
        assert!(!post.encrypted);
    }

    #[test]
    fn missing_output_degrades_to_text_post() {
        let tx = RawTransaction {
            txid: "00".repeat(32),
            vout: Vec::new(),
            size: 0,
            time: None,
        };
        let post = decode_transaction(&tx, &no_keys);
        assert_eq!(post.inscription_kind, InscriptionKind::Text);
        // No embedded or tx time: processing time is used.
        assert!(post.timestamp_ms > 1_700_000_000_000);
    }

    #[test]
    fn tx_time_used_when_envelope_has_none() {
        let payload = br#"{"app":"wallt4","title":"t","content":"c"}"#;
        let script = wallt4_script_fmt::build_data_script(payload).unwrap();
        let post = decode_transaction(
            &tx_with_script_hex(&hex::encode(script.as_bytes())),
            &no_keys,
        );
        assert_eq!(post.timestamp_ms, 1_700_000_000_000);
        assert_eq!(post.created_at_display, "2023-11-14 22:13");
    }

    #[test]
    fn wallt4_flags_propagate_without_decrypt() {
        let payload = br#"{"protocol":"wallt4","data":{"title":"t","content":"c","encrypted":true,"encryptionLevel":2}}"#;
        let script = wallt4_script_fmt::build_data_script(payload).unwrap();
        let post = decode_transaction(
            &tx_with_script_hex(&hex::encode(script.as_bytes())),
            &no_keys,
        );
        assert!(post.encrypted);
        assert_eq!(post.encryption_level, EncryptionLevel::Follower);
        assert_eq!(post.content, "c");
    }
}
