//! Wallet-facing payload and submission errors

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::validate::FieldError;

/// What the wallet signs and sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub to_address: Address,
    pub calldata: Bytes,
    /// Native currency sent with the call, in wei
    #[serde(serialize_with = "decimal")]
    pub value: U256,
}

fn decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// The wallet collaborator
#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Sign and broadcast, returning the transaction hash
    async fn send_transaction(&self, payload: &TransactionPayload) -> anyhow::Result<TxHash>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please connect your wallet first")]
    WalletNotConnected,

    #[error("Please select a network")]
    NetworkNotSelected,

    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Transaction calldata has not been generated")]
    CalldataNotGenerated,

    #[error("Invalid {field}: {error}")]
    InvalidField { field: &'static str, error: FieldError },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Wallet is on chain {actual} but the timelock is on chain {expected}")]
    WrongChain { expected: u64, actual: u64 },

    #[error("Transaction rejected by user")]
    Rejected,

    #[error("Transaction failed: {0}")]
    Failed(String),
}

impl SubmitError {
    /// Classify a wallet error; rejections are reported separately
    pub fn from_wallet(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        let lower = message.to_lowercase();
        if lower.contains("user rejected") || lower.contains("denied") {
            Self::Rejected
        } else {
            Self::Failed(message)
        }
    }
}
