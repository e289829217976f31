//! Error taxonomy for the encode/decode pipeline

use thiserror::Error;

/// Errors produced while coercing, encoding or decoding call data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Argument is not a `0x`-prefixed 20-byte hex address (or fails its checksum)
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Argument cannot be parsed as an integer
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Tuple or array argument is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Required arguments were left empty
    #[error("incomplete arguments: missing values at {missing:?}")]
    IncompleteArguments { missing: Vec<usize> },

    /// The ABI coder rejected the values
    #[error("encoding failed: {0}")]
    EncodingFailure(String),

    /// No encodable function matches the requested signature
    #[error("function signature not found: {0}")]
    SignatureNotFound(String),

    /// Call data could not be decoded against the signature
    #[error("decoding failed: {0}")]
    DecodingFailure(String),
}

impl CodecError {
    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingFailure(msg.into())
    }

    pub(crate) fn decoding(msg: impl Into<String>) -> Self {
        Self::DecodingFailure(msg.into())
    }
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
