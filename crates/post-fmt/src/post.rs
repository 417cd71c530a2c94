//! The canonical post record and timestamp normalization.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::level::EncryptionLevel;

/// Which classification branch produced a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InscriptionKind {
    /// Either wallt4 envelope shape.
    Wallt4,
    /// Untyped JSON article.
    Json,
    /// Plain text or unrecognized JSON.
    Text,
    /// Opaque (undecrypted) envelope.
    Unknown,
}

/// Engagement counters attached to a post. All zero at creation; the social
/// layer fills them in later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCounters {
    /// Like count.
    pub likes: u32,
    /// Comment count.
    pub comments: u32,
    /// Share count.
    pub shares: u32,
}

/// The canonical post record, the only shape downstream consumers operate
/// on. Produced fresh per decode call, never cached or mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post id, equal to the txid.
    pub id: String,

    /// Post title.
    pub title: String,

    /// Origin address of the author.
    pub user: String,

    /// Post body, or the opaque ciphertext/script hex when nothing better
    /// could be recovered.
    pub content: String,

    /// Display-ready image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Free-form content type label.
    #[serde(rename = "type")]
    pub kind: String,

    /// Normalized millisecond epoch timestamp.
    pub timestamp_ms: i64,

    /// Human-readable rendering of [`Self::timestamp_ms`], UTC.
    pub created_at_display: String,

    /// Whether the content was published encrypted.
    pub encrypted: bool,

    /// Audience tier; meaningful only when `encrypted` is true. Omitted on
    /// the wire for public posts (absence means level 0).
    #[serde(default, skip_serializing_if = "EncryptionLevel::is_public")]
    pub encryption_level: EncryptionLevel,

    /// Source transaction id.
    pub txid: String,

    /// Index of the inscription-carrying output.
    pub vout: u32,

    /// Serialized transaction size in bytes.
    pub size_bytes: u64,

    /// Classification branch that produced this post.
    pub inscription_kind: InscriptionKind,

    /// Engagement counters, all zero at creation.
    pub interaction_counters: InteractionCounters,
}

/// Normalizes a numeric on-chain timestamp to millisecond epoch by
/// magnitude.
///
/// Values at or above 1e17 are nanoseconds, 1e14 microseconds, 1e12
/// milliseconds; everything smaller is seconds.
pub fn normalize_timestamp_ms(raw: f64) -> i64 {
    if raw >= 1e17 {
        (raw / 1e6) as i64
    } else if raw >= 1e14 {
        (raw / 1e3) as i64
    } else if raw >= 1e12 {
        raw as i64
    } else {
        (raw * 1000.0) as i64
    }
}

/// Renders a millisecond epoch timestamp for display, UTC.
pub fn format_timestamp(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}
