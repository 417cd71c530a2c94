//! Output-script codec for wallt4 inscriptions.
//!
//! This crate handles the byte level of the inscription pipeline: turning a
//! hex-encoded transaction output script into the concatenated push-data
//! payload embedded in it, and building such scripts in the first place.
//!
//! The decode direction is heuristic by design. It recovers payloads from
//! conventional data-carrier script patterns and tolerates malformed or
//! truncated scripts, because on-chain data is caller-controlled and a
//! single bad output must never abort a batch.

mod build;
mod decode;
mod error;

pub use build::build_data_script;
pub use decode::{decode_script_hex, extract_push_data, extract_push_data_hex};
pub use error::{ScriptFmtError, ScriptFmtResult};
