//! Encode/decode result types shared by the pipeline and its callers

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::CodecError;

/// Outcome of an encode operation in the shape the form layer renders:
/// failures collapse to `success: false` with empty data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedCall {
    pub success: bool,
    /// `0x`-prefixed hex, empty on failure
    pub encoded_data: String,
}

impl EncodedCall {
    pub fn failed() -> Self {
        Self::default()
    }

    /// The encoded data, or `None` when encoding failed
    pub fn data(&self) -> Option<&str> {
        self.success.then_some(self.encoded_data.as_str())
    }
}

impl From<Result<Bytes, CodecError>> for EncodedCall {
    fn from(result: Result<Bytes, CodecError>) -> Self {
        match result {
            Ok(bytes) => Self {
                success: true,
                encoded_data: format!("0x{}", hex::encode(&bytes)),
            },
            Err(err) => {
                tracing::debug!(error = %err, "encoding failed");
                Self::failed()
            }
        }
    }
}

/// One decoded parameter, formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedParam {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl DecodedParam {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Display-side decode result. Decoding never blocks submission, so a
/// failure is a state to render rather than an error to propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "params", rename_all = "camelCase")]
pub enum DecodePreview {
    Decoded(Vec<DecodedParam>),
    Undecodable,
}

impl DecodePreview {
    pub fn params(&self) -> &[DecodedParam] {
        match self {
            Self::Decoded(params) => params,
            Self::Undecodable => &[],
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }
}
