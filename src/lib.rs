//! Encoding pipeline for Compound-style timelock transactions
//!
//! Layers:
//! - `domain`: ABI entries, signature resolution, timelock operations, ETA
//! - `infrastructure`: coercion, encoding and decoding over alloy-dyn-abi,
//!   ABI library sources
//! - `modules`: the transaction form, queued-transaction follow-ups and
//!   command-line reports
//! - `core`: error taxonomy and the wallet session
//! - `config`: TOML configuration

pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;

pub use crate::core::{CodecError, Session};
pub use crate::domain::abi::{DecodedParam, EncodedCall};
pub use crate::domain::timelock::TimelockOperation;
pub use crate::modules::form::TransactionForm;
