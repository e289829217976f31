//! Decode reports for parameter data and full timelock calls

use super::ToolResult;
use crate::core::Result;
use crate::domain::abi::DecodePreview;
use crate::infrastructure::abi::{decode_params, decode_timelock_call};

/// Decode parameter data (no selector) against a signature
pub fn decode(signature: &str, calldata: &str) -> Result<ToolResult> {
    let params = decode_params(signature, calldata)?;
    Ok(params.into_iter().fold(
        ToolResult::new("ABI Decode").add("signature", signature),
        |result, param| result.add(format!("{} ({})", param.name, param.kind), param.value),
    ))
}

/// Decode full timelock calldata, including its inner call when possible
pub fn decode_call(calldata: &str) -> Result<ToolResult> {
    let decoded = decode_timelock_call(calldata)?;
    let mut result = decoded.params().into_iter().fold(
        ToolResult::new("Timelock Call").add("method", decoded.call.operation.to_string()),
        |result, param| result.add(param.name, param.value),
    );

    result = match &decoded.inner {
        DecodePreview::Decoded(params) => params.iter().fold(result, |result, param| {
            result.add(format!("  {} ({})", param.name, param.kind), param.value.clone())
        }),
        DecodePreview::Undecodable => result.add("inner", "unable to decode"),
    };
    Ok(result)
}
