//! Push-data extraction from output scripts.
//!
//! Inscription payloads are carried in the pushed-data operands of a
//! data-carrier output script. The extractor walks the raw script bytes and
//! concatenates every push operand, in script order, into one buffer. It is
//! deliberately a data recoverer rather than a script interpreter: non-push
//! opcodes are skipped one byte at a time, and a push whose declared length
//! overruns the buffer yields whatever bytes remain instead of failing.

use crate::error::ScriptFmtResult;

/// OP_PUSHDATA1: next byte is the push length.
const OP_PUSHDATA1: u8 = 0x4c;

/// OP_PUSHDATA2: next two bytes (LE) are the push length.
const OP_PUSHDATA2: u8 = 0x4d;

/// OP_PUSHDATA4: next four bytes (LE) are the push length.
const OP_PUSHDATA4: u8 = 0x4e;

/// Decodes a hex-encoded script into raw bytes.
///
/// Odd-length or non-hex input is a hard input error; everything past this
/// point is tolerant.
pub fn decode_script_hex(script_hex: &str) -> ScriptFmtResult<Vec<u8>> {
    Ok(hex::decode(script_hex)?)
}

/// Extracts the concatenated push-data operands from a script.
///
/// Walks the buffer from offset 0. Direct pushes (`0x01..=0x4b`) and the
/// three PUSHDATA forms contribute their operand bytes; `0x00` contributes
/// nothing; any other opcode byte is skipped without interpreting operands.
///
/// Never fails: a push length that would read past the end of the buffer
/// yields the bytes that are actually available, and a length prefix that is
/// itself truncated ends the walk.
pub fn extract_push_data(script: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut at = 0usize;

    while at < script.len() {
        let op = script[at];
        at += 1;

        let len = match op {
            // OP_0 pushes an empty byte string.
            0x00 => continue,
            1..=0x4b => op as usize,
            OP_PUSHDATA1 => {
                let Some(&l) = script.get(at) else { break };
                at += 1;
                l as usize
            }
            OP_PUSHDATA2 => {
                let Some(raw) = script.get(at..at + 2) else {
                    break;
                };
                at += 2;
                u16::from_le_bytes([raw[0], raw[1]]) as usize
            }
            OP_PUSHDATA4 => {
                let Some(raw) = script.get(at..at + 4) else {
                    break;
                };
                at += 4;
                u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize
            }
            // Not a push; skip the single opcode byte.
            _ => continue,
        };

        match script.get(at..at + len) {
            Some(data) => {
                out.extend_from_slice(data);
                at += len;
            }
            None => {
                // Truncated push: keep what is there and stop.
                out.extend_from_slice(&script[at..]);
                break;
            }
        }
    }

    out
}

/// Convenience wrapper: hex decode then extract push data.
pub fn extract_push_data_hex(script_hex: &str) -> ScriptFmtResult<Vec<u8>> {
    Ok(extract_push_data(&decode_script_hex(script_hex)?))
}
