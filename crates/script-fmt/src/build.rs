//! Data-carrier script builder, the encode direction of the codec.

use bitcoin::{
    ScriptBuf, blockdata::script, constants::MAX_SCRIPT_ELEMENT_SIZE, opcodes::all::OP_RETURN,
    script::PushBytesBuf,
};

use crate::error::ScriptFmtError;

/// Builds a data-carrier output script holding the given payload.
///
/// Creates a script with the structure: `OP_RETURN <payload_chunks>`. The
/// payload is split into chunks of up to [`MAX_SCRIPT_ELEMENT_SIZE`] bytes to
/// comply with Bitcoin's consensus rules. Running the payload back through
/// [`extract_push_data`](crate::extract_push_data) reproduces it exactly.
///
/// # Errors
///
/// Returns [`ScriptFmtError`] if a payload chunk cannot be converted to a
/// `PushBytesBuf`.
pub fn build_data_script(payload: &[u8]) -> Result<ScriptBuf, ScriptFmtError> {
    let mut builder = script::Builder::new().push_opcode(OP_RETURN);

    for chunk in payload.chunks(MAX_SCRIPT_ELEMENT_SIZE) {
        let push_bytes = PushBytesBuf::try_from(chunk.to_vec()).map_err(|_| {
            ScriptFmtError::PayloadChunkConversion {
                chunk_size: chunk.len(),
            }
        })?;
        builder = builder.push_slice(push_bytes);
    }

    Ok(builder.into_script())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::blockdata::script::Instruction::PushBytes;

    #[test]
    fn test_payload_chunking() {
        let test_cases = vec![
            (0, Vec::new()),
            (1, vec![1]),
            (520, vec![520]),
            (521, vec![520, 1]),
            (1040, vec![520, 520]),
            (2000, vec![520, 520, 520, 440]),
        ];

        for (payload_size, expected_pushes) in test_cases {
            let payload: Vec<u8> = (0..payload_size).map(|i| (i % 256) as u8).collect();
            let script = build_data_script(&payload).unwrap();
            assert!(script.is_op_return());

            let data_pushes: Vec<_> = script
                .instructions()
                .filter_map(|inst| {
                    if let Ok(PushBytes(data)) = inst {
                        Some(data.len())
                    } else {
                        None
                    }
                })
                .collect();

            assert_eq!(
                data_pushes, expected_pushes,
                "payload size {payload_size}: expected pushes {expected_pushes:?}"
            );
        }
    }
}
