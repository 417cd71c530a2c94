//! Inscription content codec and tiered-access decryption for wallt4 posts.
//!
//! Turns a raw transaction carrying an inscription into the canonical
//! [`Post`] record, tolerating every historical envelope shape along the
//! way. The pipeline runs strictly forward: script hex to push data (via
//! `wallt4-script-fmt`), push data to text/JSON, classification into a
//! [`ContentEnvelope`], an optional single decrypt attempt for
//! tier-encrypted envelopes, then normalization.
//!
//! The overriding policy is availability over strictness: malformed data of
//! any kind degrades to a best-effort post rather than an error, so callers
//! mapping over a batch of transactions always get one post per
//! transaction. Only [`decode_transaction`]'s key lookup gives the codec
//! any capability beyond reading public bytes.

mod crypt;
mod decode;
mod envelope;
mod extract;
mod level;
mod post;
mod redact;
mod sniff;
mod tx;

pub use crypt::{
    CipherMetadata, DecryptError, EncryptedEnvelope, KeyHierarchy, NONCE_LEN, decrypt_envelope,
    derive_key, seal_envelope,
};
pub use decode::decode_transaction;
pub use envelope::{
    AppMarker, ContentEnvelope, GenericArticle, LegacyFlatEnvelope, PostFields, ProtocolMarker,
    Wallt4Envelope,
};
pub use extract::{ExtractedContent, decode_text, extract_content, find_json_object};
pub use level::{EncryptionLevel, LevelError};
pub use post::{
    InscriptionKind, InteractionCounters, Post, format_timestamp, normalize_timestamp_ms,
};
pub use redact::redact_for_preview;
pub use sniff::normalize_image_url;
pub use tx::{RawTransaction, ScriptPubKeyInfo, TxOutInfo};
