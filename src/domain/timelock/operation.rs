//! Timelock entry points and the bundled Compound timelock ABI

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use serde::{Deserialize, Serialize};

use crate::domain::abi::{encodable_functions, parse_abi, selector, AbiEntry, FunctionOption};

sol! {
    /// Compound-style timelock entry points
    interface ICompoundTimelock {
        function queueTransaction(address target, uint256 value, string signature, bytes data, uint256 eta) external returns (bytes32);
        function executeTransaction(address target, uint256 value, string signature, bytes data, uint256 eta) external payable returns (bytes memory);
        function cancelTransaction(address target, uint256 value, string signature, bytes data, uint256 eta) external;
    }
}

const COMPOUND_TIMELOCK_ABI: &str = include_str!("compound_timelock.json");

/// Parameter types shared by all three operations
pub const TIMELOCK_PARAM_TYPES: [&str; 5] = ["address", "uint256", "string", "bytes", "uint256"];

/// Parameter names shared by all three operations
pub const TIMELOCK_PARAM_NAMES: [&str; 5] = ["target", "value", "signature", "data", "eta"];

/// The three timelock calls a transaction goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimelockOperation {
    #[serde(rename = "queueTransaction")]
    Queue,
    #[serde(rename = "executeTransaction")]
    Execute,
    #[serde(rename = "cancelTransaction")]
    Cancel,
}

impl TimelockOperation {
    pub const ALL: [Self; 3] = [Self::Queue, Self::Execute, Self::Cancel];

    pub fn function_name(self) -> &'static str {
        match self {
            Self::Queue => "queueTransaction",
            Self::Execute => "executeTransaction",
            Self::Cancel => "cancelTransaction",
        }
    }

    /// Canonical signature, e.g. `queueTransaction(address,uint256,string,bytes,uint256)`
    pub fn signature(self) -> &'static str {
        match self {
            Self::Queue => ICompoundTimelock::queueTransactionCall::SIGNATURE,
            Self::Execute => ICompoundTimelock::executeTransactionCall::SIGNATURE,
            Self::Cancel => ICompoundTimelock::cancelTransactionCall::SIGNATURE,
        }
    }

    pub fn selector(self) -> [u8; 4] {
        selector(self.signature())
    }

    pub fn from_selector(sel: [u8; 4]) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.selector() == sel)
    }

    /// Only `executeTransaction` moves native currency; for the other two
    /// `value` is a parameter that must match the queued value.
    pub fn transfers_value(self) -> bool {
        matches!(self, Self::Execute)
    }
}

impl fmt::Display for TimelockOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

impl FromStr for TimelockOperation {
    type Err = String;

    /// Accepts `queue`, `queueTransaction` or the full signature
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let name = s.split('(').next().unwrap_or(s);
        let op = match name.to_ascii_lowercase().as_str() {
            "queue" | "queuetransaction" => Self::Queue,
            "execute" | "executetransaction" => Self::Execute,
            "cancel" | "canceltransaction" => Self::Cancel,
            _ => return Err(format!("unknown timelock method '{s}'")),
        };
        if s.contains('(') && s.replace(' ', "") != op.signature() {
            return Err(format!("unexpected signature for {op}: '{s}'"));
        }
        Ok(op)
    }
}

/// A decoded (or to-be-encoded) timelock call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelockCall {
    pub operation: TimelockOperation,
    pub target: Address,
    pub value: U256,
    /// Signature of the inner call, as the target contract hashes it
    pub signature: String,
    /// Inner parameter data, without selector
    pub data: Bytes,
    pub eta: U256,
}

impl TimelockCall {
    pub fn eta_secs(&self) -> Option<u64> {
        u64::try_from(self.eta).ok()
    }
}

/// The bundled Compound timelock ABI, in declaration order
pub fn bundled_abi() -> &'static [AbiEntry] {
    static ENTRIES: OnceLock<Vec<AbiEntry>> = OnceLock::new();
    ENTRIES.get_or_init(|| {
        parse_abi(COMPOUND_TIMELOCK_ABI).unwrap_or_else(|err| {
            tracing::error!(error = %err, "bundled timelock ABI is malformed");
            Vec::new()
        })
    })
}

/// Timelock methods offered for a selected timelock: the queue, execute and
/// cancel functions of the bundled ABI.
pub fn timelock_method_options() -> Vec<FunctionOption> {
    encodable_functions(bundled_abi())
        .filter(|function| {
            TimelockOperation::ALL
                .iter()
                .any(|op| op.function_name() == function.name)
        })
        .map(|function| {
            let key = function.selection_key();
            FunctionOption {
                value: key.clone(),
                label: key,
            }
        })
        .collect()
}
