use thiserror::Error;

/// Errors for decoding and building inscription scripts.
#[derive(Debug, Error)]
pub enum ScriptFmtError {
    /// Script hex was not decodable (odd length or non-hex characters).
    #[error("invalid script hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Failed to convert a payload chunk into `PushBytesBuf`.
    #[error("failed to convert {chunk_size} byte payload chunk to push bytes buffer")]
    PayloadChunkConversion {
        /// Size of the chunk that failed to convert.
        chunk_size: usize,
    },
}

/// Wrapper result type.
pub type ScriptFmtResult<T> = Result<T, ScriptFmtError>;
