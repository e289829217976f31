//! Calldata decoding using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_sol_types::SolInterface;

use crate::core::{CodecError, Result};
use crate::domain::abi::{DecodePreview, DecodedParam, FunctionEntry, ParsedSignature};
use crate::domain::timelock::{
    ICompoundTimelock::ICompoundTimelockCalls, TimelockCall, TimelockOperation,
    TIMELOCK_PARAM_NAMES, TIMELOCK_PARAM_TYPES,
};

/// Decode parameter data (no selector) against a signature.
///
/// The signature may embed parameter names (`transfer(address to, uint256)`);
/// unnamed parameters are shown as `param{idx}`.
pub fn decode_params(signature: &str, calldata: &str) -> Result<Vec<DecodedParam>> {
    let parsed = ParsedSignature::parse(signature)?;
    let types = parsed
        .types()
        .into_iter()
        .map(|ty| {
            DynSolType::parse(ty)
                .map_err(|e| CodecError::decoding(format!("unknown type '{ty}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let data = decode_hex(calldata)?;
    if types.is_empty() {
        return Ok(Vec::new());
    }

    let kinds: Vec<String> = types.iter().map(|ty| ty.sol_type_name().into_owned()).collect();
    let decoded = DynSolType::Tuple(types)
        .abi_decode_params(&data)
        .map_err(|e| CodecError::decoding(e.to_string()))?;
    let values = match decoded {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    };

    Ok(parsed
        .display_names()
        .into_iter()
        .zip(kinds)
        .zip(values.iter())
        .map(|((name, kind), value)| DecodedParam::new(name, kind, format_value(value)))
        .collect())
}

/// Decode parameter data of an ABI function, naming values after its inputs
pub fn decode_function_args(function: &FunctionEntry, calldata: &str) -> Result<Vec<DecodedParam>> {
    let params = function
        .inputs
        .iter()
        .map(|input| {
            let ty = input.param_type()?.canonical();
            Ok(format!("{ty} {}", input.name).trim_end().to_string())
        })
        .collect::<Result<Vec<_>>>()?;
    decode_params(&format!("{}({})", function.name, params.join(",")), calldata)
}

/// Display decode that degrades to [`DecodePreview::Undecodable`]
pub fn decode_preview(signature: &str, calldata: &str) -> DecodePreview {
    match decode_params(signature, calldata) {
        Ok(params) => DecodePreview::Decoded(params),
        Err(err) => {
            tracing::warn!(signature, error = %err, "unable to decode calldata");
            DecodePreview::Undecodable
        }
    }
}

/// A decoded timelock call together with the display decode of its inner call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTimelockCall {
    pub call: TimelockCall,
    pub inner: DecodePreview,
}

impl DecodedTimelockCall {
    /// The five outer parameters, formatted for display
    pub fn params(&self) -> Vec<DecodedParam> {
        let call = &self.call;
        let values = [
            call.target.to_checksum(None),
            call.value.to_string(),
            call.signature.clone(),
            format!("0x{}", hex::encode(&call.data)),
            call.eta.to_string(),
        ];
        TIMELOCK_PARAM_NAMES
            .iter()
            .zip(TIMELOCK_PARAM_TYPES)
            .zip(values)
            .map(|((name, kind), value)| DecodedParam::new(*name, kind, value))
            .collect()
    }
}

/// Decode full timelock calldata (selector included)
pub fn decode_timelock_call(calldata: &str) -> Result<DecodedTimelockCall> {
    let data = decode_hex(calldata)?;
    let selector: [u8; 4] = data
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| {
            CodecError::decoding("calldata too short (need at least 4 bytes for selector)")
        })?;
    let operation = TimelockOperation::from_selector(selector).ok_or_else(|| {
        CodecError::decoding(format!("unknown timelock selector 0x{}", hex::encode(selector)))
    })?;

    let decoded = ICompoundTimelockCalls::abi_decode(&data)
        .map_err(|e| CodecError::decoding(e.to_string()))?;
    let (target, value, signature, inner, eta) = match decoded {
        ICompoundTimelockCalls::queueTransaction(c) => {
            (c.target, c.value, c.signature, c.data, c.eta)
        }
        ICompoundTimelockCalls::executeTransaction(c) => {
            (c.target, c.value, c.signature, c.data, c.eta)
        }
        ICompoundTimelockCalls::cancelTransaction(c) => {
            (c.target, c.value, c.signature, c.data, c.eta)
        }
    };

    let inner_preview = decode_preview(&signature, &format!("0x{}", hex::encode(&inner)));
    Ok(DecodedTimelockCall {
        call: TimelockCall {
            operation,
            target,
            value,
            signature,
            data: inner,
            eta,
        },
        inner: inner_preview,
    })
}

fn decode_hex(calldata: &str) -> Result<Vec<u8>> {
    let calldata = calldata.trim();
    let hex = calldata.strip_prefix("0x").unwrap_or(calldata);
    hex::decode(hex).map_err(|e| CodecError::decoding(format!("invalid hex: {e}")))
}

/// Format a decoded value for display: addresses checksummed, integers in
/// decimal, byte strings as `0x` hex, compound values comma-joined.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::FixedBytes(word, size) => {
            format!("0x{}", hex::encode(&word[..(*size).min(32)]))
        }
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().map(format_value).collect::<Vec<_>>().join(",")
        }
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}
