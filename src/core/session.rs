//! Wallet session owned by the caller
//!
//! Holds the connected wallet and the timelock contracts loaded for it.
//! Components that need either borrow the session explicitly.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A connected wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletConnection {
    pub address: Address,
    /// Chain the wallet is on; unknown until the provider reports it
    pub chain_id: Option<u64>,
}

/// A timelock contract the user can send through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockContract {
    pub id: u64,
    #[serde(default)]
    pub remark: String,
    pub chain_id: u64,
    pub contract_address: Address,
}

impl TimelockContract {
    /// Option label: the remark, or the address when there is none
    pub fn label(&self) -> String {
        if self.remark.trim().is_empty() {
            self.contract_address.to_checksum(None)
        } else {
            self.remark.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    wallet: Option<WalletConnection>,
    timelocks: Vec<TimelockContract>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, address: Address, chain_id: Option<u64>) {
        tracing::info!(%address, ?chain_id, "wallet connected");
        self.wallet = Some(WalletConnection { address, chain_id });
    }

    /// Forget the wallet and everything loaded for it
    pub fn disconnect(&mut self) {
        if self.wallet.take().is_some() {
            tracing::info!("wallet disconnected");
        }
        self.timelocks.clear();
    }

    pub fn switch_chain(&mut self, chain_id: u64) {
        if let Some(wallet) = self.wallet.as_mut() {
            wallet.chain_id = Some(chain_id);
        }
    }

    pub fn wallet(&self) -> Option<&WalletConnection> {
        self.wallet.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.wallet.map(|w| w.address)
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.wallet.and_then(|w| w.chain_id)
    }

    pub fn set_timelocks(&mut self, timelocks: Vec<TimelockContract>) {
        self.timelocks = timelocks;
    }

    pub fn timelocks(&self) -> &[TimelockContract] {
        &self.timelocks
    }

    pub fn timelock(&self, id: u64) -> Option<&TimelockContract> {
        self.timelocks.iter().find(|t| t.id == id)
    }
}
