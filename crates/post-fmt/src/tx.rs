//! Raw transaction input types, as returned by a blockchain data provider.

use serde::{Deserialize, Serialize};

/// A raw transaction. The codec only reads it; retrieval is the caller's
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction id, hex.
    pub txid: String,

    /// Outputs in order. By convention output 0 carries the inscription and
    /// output 1 the sender's change/identity.
    #[serde(default)]
    pub vout: Vec<TxOutInfo>,

    /// Serialized transaction size in bytes.
    #[serde(default)]
    pub size: u64,

    /// Block/mempool acceptance time in epoch seconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
}

/// One transaction output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutInfo {
    /// The output script.
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKeyInfo,
}

/// Output script info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptPubKeyInfo {
    /// Hex-encoded script.
    #[serde(default)]
    pub hex: String,

    /// Addresses the provider attributed to this output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
}

impl RawTransaction {
    /// Script hex of the inscription-carrying output, if present.
    pub fn inscription_script_hex(&self) -> Option<&str> {
        self.vout.first().map(|out| out.script_pub_key.hex.as_str())
    }

    /// Origin address attached to the identity output (`vout[1]`).
    pub fn origin_address(&self) -> Option<&str> {
        self.vout
            .get(1)?
            .script_pub_key
            .addresses
            .as_ref()?
            .first()
            .map(String::as_str)
    }
}
