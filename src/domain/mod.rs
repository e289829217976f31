//! Domain layer - ABI and timelock models, free of I/O

pub mod abi;
pub mod timelock;
