//! Argument coercion: raw form strings into coder values
//!
//! Elementary types take the raw string directly. Tuples and arrays take
//! JSON text whose shape follows the type (objects keyed by component name
//! or positional arrays for tuples).

use std::str::FromStr;

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, FixedBytes, Function, Sign, I256, U256};
use serde_json::Value;

use crate::core::{CodecError, Result};
use crate::domain::abi::ParamType;

/// Coerce one raw argument for a parameter of type `ty`
pub fn coerce_argument(raw: &str, ty: &ParamType) -> Result<DynSolValue> {
    if !ty.takes_json() {
        return coerce_elementary(raw, &ty.sol_type()?);
    }
    let json: Value =
        serde_json::from_str(raw).map_err(|e| CodecError::InvalidJson(e.to_string()))?;
    from_json(&json, ty)
}

/// Coerce a raw string for an elementary coder type
pub fn coerce_elementary(raw: &str, ty: &DynSolType) -> Result<DynSolValue> {
    match ty {
        DynSolType::Address => coerce_address(raw).map(DynSolValue::Address),
        DynSolType::Uint(bits) => coerce_uint(raw, *bits).map(|v| DynSolValue::Uint(v, *bits)),
        DynSolType::Int(bits) => coerce_int(raw, *bits).map(|v| DynSolValue::Int(v, *bits)),
        DynSolType::Bool => match raw {
            "true" => Ok(DynSolValue::Bool(true)),
            "false" => Ok(DynSolValue::Bool(false)),
            other => Err(CodecError::encoding(format!(
                "invalid bool '{other}': expected true or false"
            ))),
        },
        // empty input is an empty byte string
        DynSolType::Bytes if raw.is_empty() => Ok(DynSolValue::Bytes(Vec::new())),
        DynSolType::Bytes => decode_hex(raw).map(DynSolValue::Bytes),
        DynSolType::FixedBytes(size) => {
            let bytes = decode_hex(raw)?;
            if bytes.len() != *size {
                return Err(CodecError::encoding(format!(
                    "incorrect data length for bytes{size}: got {} bytes",
                    bytes.len()
                )));
            }
            Ok(DynSolValue::FixedBytes(FixedBytes::right_padding_from(&bytes), *size))
        }
        DynSolType::Function => {
            let bytes = decode_hex(raw)?;
            if bytes.len() != 24 {
                return Err(CodecError::encoding("function pointer must be 24 bytes"));
            }
            Ok(DynSolValue::Function(Function::from_slice(&bytes)))
        }
        DynSolType::String => Ok(DynSolValue::String(raw.to_string())),
        other => Err(CodecError::encoding(format!(
            "type {} takes a JSON value",
            other.sol_type_name()
        ))),
    }
}

/// Whether `s` matches `^0x[0-9a-fA-F]{40}$`
pub fn is_hex_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Parse an address; mixed-case input must carry a valid EIP-55 checksum
pub fn coerce_address(raw: &str) -> Result<Address> {
    if !is_hex_address(raw) {
        return Err(CodecError::InvalidAddress(format!(
            "'{raw}' is not a 0x-prefixed 40 hex digit address"
        )));
    }

    let hex = &raw[2..];
    let mixed_case = hex.chars().any(|c| c.is_ascii_uppercase())
        && hex.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case {
        return Address::parse_checksummed(raw, None)
            .map_err(|_| CodecError::InvalidAddress(format!("bad checksum for '{raw}'")));
    }

    Address::from_str(raw).map_err(|e| CodecError::InvalidAddress(e.to_string()))
}

/// Parse a permissive big integer: optional `-`, decimal or `0x`/`0o`/`0b`
/// digits. Returns sign and magnitude.
fn parse_big_int(raw: &str) -> Result<(bool, U256)> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (radix, digits) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        Some("0o") | Some("0O") => (8, &digits[2..]),
        Some("0b") | Some("0B") => (2, &digits[2..]),
        _ => (10, digits),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(CodecError::InvalidInteger(format!("'{raw}' is not an integer")));
    }

    // digits are valid, so a failure here is a value wider than 256 bits
    let magnitude = U256::from_str_radix(digits, radix as u64)
        .map_err(|_| CodecError::encoding(format!("value '{raw}' out of range")))?;
    Ok((negative && !magnitude.is_zero(), magnitude))
}

pub fn coerce_uint(raw: &str, bits: usize) -> Result<U256> {
    let (negative, magnitude) = parse_big_int(raw)?;
    if negative || magnitude.bit_len() > bits {
        return Err(CodecError::encoding(format!(
            "value '{}' out of range for uint{bits}",
            raw.trim()
        )));
    }
    Ok(magnitude)
}

pub fn coerce_int(raw: &str, bits: usize) -> Result<I256> {
    let (negative, magnitude) = parse_big_int(raw)?;
    let out_of_range =
        || CodecError::encoding(format!("value '{}' out of range for int{bits}", raw.trim()));

    // int{bits} spans [-2^(bits-1), 2^(bits-1) - 1]
    let limit = U256::from(1u8) << (bits - 1);
    let fits = if negative { magnitude <= limit } else { magnitude < limit };
    if !fits {
        return Err(out_of_range());
    }

    let sign = if negative { Sign::Negative } else { Sign::Positive };
    I256::checked_from_sign_and_abs(sign, magnitude).ok_or_else(out_of_range)
}

fn decode_hex(raw: &str) -> Result<Vec<u8>> {
    let hex = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| CodecError::encoding(format!("hex value '{raw}' must start with 0x")))?;
    hex::decode(hex).map_err(|e| CodecError::encoding(format!("invalid hex '{raw}': {e}")))
}

/// Build a coder value from parsed JSON following `ty`
pub fn from_json(value: &Value, ty: &ParamType) -> Result<DynSolValue> {
    match ty {
        ParamType::Elementary(name) => {
            let sol = ty.sol_type()?;
            match value {
                Value::String(s) => coerce_elementary(s, &sol),
                Value::Number(n) if matches!(sol, DynSolType::Uint(_) | DynSolType::Int(_)) => {
                    coerce_elementary(&n.to_string(), &sol)
                }
                Value::Bool(b) if sol == DynSolType::Bool => Ok(DynSolValue::Bool(*b)),
                other => Err(CodecError::encoding(format!(
                    "expected {name}, got JSON {other}"
                ))),
            }
        }
        ParamType::Tuple(components) => {
            let values = match value {
                Value::Array(items) => {
                    if items.len() != components.len() {
                        return Err(CodecError::encoding(format!(
                            "tuple expects {} values, got {}",
                            components.len(),
                            items.len()
                        )));
                    }
                    components
                        .iter()
                        .zip(items)
                        .map(|(component, item)| from_json(item, &component.kind))
                        .collect::<Result<Vec<_>>>()?
                }
                Value::Object(fields) => components
                    .iter()
                    .map(|component| {
                        let item = fields.get(&component.name).ok_or_else(|| {
                            let field = &component.name;
                            CodecError::encoding(format!("missing tuple field '{field}'"))
                        })?;
                        from_json(item, &component.kind)
                    })
                    .collect::<Result<Vec<_>>>()?,
                other => {
                    return Err(CodecError::encoding(format!(
                        "expected tuple {ty}, got JSON {other}"
                    )))
                }
            };
            Ok(DynSolValue::Tuple(values))
        }
        ParamType::Array(inner, len) => {
            let Value::Array(items) = value else {
                return Err(CodecError::encoding(format!("expected array {ty}, got JSON {value}")));
            };
            if let Some(len) = len {
                if items.len() != *len {
                    return Err(CodecError::encoding(format!(
                        "{ty} expects {len} elements, got {}",
                        items.len()
                    )));
                }
            }
            let values = items
                .iter()
                .map(|item| from_json(item, inner))
                .collect::<Result<Vec<_>>>()?;
            Ok(match len {
                Some(_) => DynSolValue::FixedArray(values),
                None => DynSolValue::Array(values),
            })
        }
    }
}
