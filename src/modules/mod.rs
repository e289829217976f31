//! Application modules
//!
//! - form: transaction creation form, preview and submission
//! - transactions: execute/cancel calls on queued transactions
//! - toolkit: label/value reports for the command line

pub mod form;
pub mod toolkit;
pub mod transactions;
