//! ABI domain models
//!
//! Typed ABI entries, function signature resolution and the result types
//! of the encode/decode pipeline, independent of the coder implementation
//! (alloy-dyn-abi) living in `infrastructure::abi`.

mod call;
mod entry;
mod library;
mod signature;

pub use call::{DecodePreview, DecodedParam, EncodedCall};
pub use entry::{
    parse_abi, AbiEntry, Component, ConstructorEntry, ErrorEntry, EventEntry, FunctionEntry,
    Param, ParamType, StateMutability,
};
pub use library::{AbiLibrary, AbiRecord};
pub use signature::{
    encodable_functions, function_options, require_function, resolve_function, selector,
    selector_hex, split_top_level, FunctionOption, ParsedSignature, SignatureParam,
};
