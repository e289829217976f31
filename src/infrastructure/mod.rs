//! Infrastructure layer - external integrations
//!
//! This layer contains:
//! - Argument coercion, encoding and decoding using alloy-dyn-abi
//! - ABI library loading from disk and from the backend API

pub mod abi;

pub use abi::{AbiApiClient, AbiScanner};
