//! Inner and outer call encoding using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Bytes, U256};

use super::coerce::{coerce_address, coerce_argument, coerce_uint};
use crate::core::{CodecError, Result};
use crate::domain::abi::{FunctionEntry, ParamType, ParsedSignature};
use crate::domain::timelock::{TimelockCall, TimelockOperation};

/// Encode the arguments of a resolved function (parameters only, no selector)
pub fn encode_function_args(function: &FunctionEntry, args: &[String]) -> Result<Bytes> {
    let types = function.param_types()?;
    encode_args(&types, args)
}

/// Encode arguments against a bare signature such as `transfer(address,uint256)`
pub fn encode_signature_args(signature: &str, args: &[String]) -> Result<Bytes> {
    let parsed = ParsedSignature::parse(signature).map_err(|err| match err {
        CodecError::DecodingFailure(msg) => CodecError::EncodingFailure(msg),
        other => other,
    })?;
    let types = parsed
        .types()
        .into_iter()
        .map(|ty| {
            DynSolType::parse(ty)
                .map(|sol| ParamType::from_sol_type(&sol))
                .map_err(|e| CodecError::encoding(format!("unknown type '{ty}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    encode_args(&types, args)
}

/// Coerce `args` in index order and ABI-encode them as parameters.
///
/// Every non-nullable parameter needs a non-empty argument; a missing
/// trailing argument counts as empty.
pub fn encode_args(types: &[ParamType], args: &[String]) -> Result<Bytes> {
    if args.len() > types.len() {
        return Err(CodecError::encoding(format!(
            "expected {} arguments, got {}",
            types.len(),
            args.len()
        )));
    }

    let missing: Vec<usize> = types
        .iter()
        .enumerate()
        .filter(|(idx, ty)| {
            let empty = args.get(*idx).map_or(true, |arg| arg.is_empty());
            empty && !ty.is_nullable()
        })
        .map(|(idx, _)| idx)
        .collect();
    if !missing.is_empty() {
        return Err(CodecError::IncompleteArguments { missing });
    }

    let values = types
        .iter()
        .enumerate()
        .map(|(idx, ty)| coerce_argument(args.get(idx).map_or("", String::as_str), ty))
        .collect::<Result<Vec<_>>>()?;

    Ok(DynSolValue::Tuple(values).abi_encode_params().into())
}

/// Build the outer timelock calldata from form values.
///
/// `inner_calldata` is the hex output of the inner encoder, with or without
/// the `0x` prefix; `eta` is in whole UNIX seconds.
pub fn encode_timelock_call(
    operation: TimelockOperation,
    target: &str,
    value: &str,
    signature: &str,
    inner_calldata: &str,
    eta: u64,
) -> Result<Bytes> {
    let data = inner_calldata.trim();
    let data = data.strip_prefix("0x").unwrap_or(data);
    let data = hex::decode(data)
        .map_err(|e| CodecError::encoding(format!("invalid inner calldata: {e}")))?;

    let call = TimelockCall {
        operation,
        target: coerce_address(target.trim())?,
        value: coerce_uint(value, 256)?,
        signature: signature.to_string(),
        data: data.into(),
        eta: U256::from(eta),
    };
    Ok(encode_timelock(&call))
}

/// Selector of the operation followed by the encoded 5-tuple
pub fn encode_timelock(call: &TimelockCall) -> Bytes {
    let params = DynSolValue::Tuple(vec![
        DynSolValue::Address(call.target),
        DynSolValue::Uint(call.value, 256),
        DynSolValue::String(call.signature.clone()),
        DynSolValue::Bytes(call.data.to_vec()),
        DynSolValue::Uint(call.eta, 256),
    ]);

    let mut out = call.operation.selector().to_vec();
    out.extend(params.abi_encode_params());
    out.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{parse_abi, resolve_function};

    const APPROVE_ABI: &str = r#"[{"type":"function","name":"approve","stateMutability":"nonpayable",
        "inputs":[{"name":"spender","type":"address"},{"name":"amount","type":"uint256"}]}]"#;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_encode_approve() {
        let entries = parse_abi(APPROVE_ABI).unwrap();
        let approve = resolve_function(&entries, "approve(address,uint256)").unwrap();
        let encoded = encode_function_args(
            approve,
            &args(&["0x1111111111111111111111111111111111111111", "1000"]),
        )
        .unwrap();

        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[12..32], &[0x11; 20]);
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(1000));
    }

    #[test]
    fn test_incomplete_arguments() {
        let entries = parse_abi(APPROVE_ABI).unwrap();
        let approve = resolve_function(&entries, "approve(address,uint256)").unwrap();

        assert_eq!(
            encode_function_args(approve, &args(&["", ""])),
            Err(CodecError::IncompleteArguments { missing: vec![0, 1] })
        );
        assert_eq!(
            encode_function_args(approve, &args(&["0x1111111111111111111111111111111111111111"])),
            Err(CodecError::IncompleteArguments { missing: vec![1] })
        );
    }

    #[test]
    fn test_nullable_arguments_may_be_empty() {
        let encoded = encode_signature_args("setName(string,bytes)", &args(&["", ""])).unwrap();
        // two offsets plus two zero lengths
        assert_eq!(encoded.len(), 128);
        assert!(encode_signature_args("setName(string,bytes)", &[]).is_ok());
    }

    #[test]
    fn test_too_many_arguments() {
        assert!(matches!(
            encode_signature_args("pause()", &args(&["1"])),
            Err(CodecError::EncodingFailure(_))
        ));
    }

    #[test]
    fn test_zero_parameter_function() {
        assert_eq!(encode_signature_args("pause()", &[]), Ok(Bytes::new()));
    }

    #[test]
    fn test_encode_timelock_call_prefix() {
        let encoded = encode_timelock_call(
            TimelockOperation::Queue,
            "0x2222222222222222222222222222222222222222",
            "0",
            "pause()",
            "0x",
            1_700_000_000,
        )
        .unwrap();
        assert_eq!(&encoded[..4], &TimelockOperation::Queue.selector());
        assert_eq!((encoded.len() - 4) % 32, 0);
    }

    #[test]
    fn test_encode_timelock_call_rejects_bad_fields() {
        let target = "0x2222222222222222222222222222222222222222";
        assert!(matches!(
            encode_timelock_call(TimelockOperation::Execute, "0x22", "0", "pause()", "0x", 1),
            Err(CodecError::InvalidAddress(_))
        ));
        assert!(matches!(
            encode_timelock_call(TimelockOperation::Execute, target, "1 ether", "pause()", "0x", 1),
            Err(CodecError::InvalidInteger(_))
        ));
        assert!(matches!(
            encode_timelock_call(TimelockOperation::Execute, target, "0", "pause()", "0xzz", 1),
            Err(CodecError::EncodingFailure(_))
        ));
    }
}
