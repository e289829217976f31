//! Follow-up calls on queued transactions
//!
//! A queued transaction is executed or cancelled by replaying the exact
//! `(target, value, signature, data, eta)` tuple it was queued with.

use std::str::FromStr;

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::core::{CodecError, Result};
use crate::domain::abi::DecodePreview;
use crate::domain::timelock::{Timeline, TimelineStatus, TimelockCall, TimelockOperation};
use crate::infrastructure::abi::{decode_preview, encode_timelock};
use crate::modules::form::TransactionPayload;

/// A queued timelock transaction as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedTransaction {
    pub chain_id: u64,
    pub contract_address: Address,
    pub target_address: Address,
    /// Decimal wei
    pub value: String,
    pub function_signature: String,
    /// Inner parameter data, with or without `0x`
    pub call_data_hex: String,
    pub eta: u64,
}

impl QueuedTransaction {
    /// Record a queue call sent to `contract_address` on `chain_id`
    pub fn from_call(
        chain_id: u64,
        contract_address: Address,
        call: &TimelockCall,
    ) -> Result<Self> {
        let eta = call
            .eta_secs()
            .ok_or_else(|| CodecError::decoding(format!("eta {} does not fit in u64", call.eta)))?;
        Ok(Self {
            chain_id,
            contract_address,
            target_address: call.target,
            value: call.value.to_string(),
            function_signature: call.signature.clone(),
            call_data_hex: format!("0x{}", hex::encode(&call.data)),
            eta,
        })
    }

    fn call_data(&self) -> Result<Bytes> {
        let data = self.call_data_hex.trim();
        let data = data.strip_prefix("0x").unwrap_or(data);
        hex::decode(data)
            .map(Bytes::from)
            .map_err(|e| CodecError::encoding(format!("invalid call data: {e}")))
    }

    fn amount(&self) -> Result<U256> {
        let value = match self.value.trim() {
            "" => "0",
            value => value,
        };
        U256::from_str(value).map_err(|e| CodecError::InvalidInteger(e.to_string()))
    }

    /// The stored tuple addressed to `operation`
    pub fn call(&self, operation: TimelockOperation) -> Result<TimelockCall> {
        Ok(TimelockCall {
            operation,
            target: self.target_address,
            value: self.amount()?,
            signature: self.function_signature.clone(),
            data: self.call_data()?,
            eta: U256::from(self.eta),
        })
    }

    /// Payload for `operation`; only execution sends `value` along
    pub fn payload(&self, operation: TimelockOperation) -> Result<TransactionPayload> {
        let call = self.call(operation)?;
        let value = if operation.transfers_value() { call.value } else { U256::ZERO };
        Ok(TransactionPayload {
            to_address: self.contract_address,
            calldata: encode_timelock(&call),
            value,
        })
    }

    pub fn execute_payload(&self) -> Result<TransactionPayload> {
        self.payload(TimelockOperation::Execute)
    }

    pub fn cancel_payload(&self) -> Result<TransactionPayload> {
        self.payload(TimelockOperation::Cancel)
    }

    pub fn timeline(&self, grace_period: u64) -> Timeline {
        Timeline::new(self.eta, grace_period)
    }

    pub fn is_executable(&self, now: u64, grace_period: u64) -> bool {
        self.timeline(grace_period).status(now) == TimelineStatus::Ready
    }

    /// Display decode of the inner call
    pub fn inner_preview(&self) -> DecodePreview {
        decode_preview(&self.function_signature, &self.call_data_hex)
    }
}
