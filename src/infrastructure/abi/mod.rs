//! ABI infrastructure - alloy-dyn-abi coercion, encoding and decoding,
//! plus ABI library sources (filesystem scan and backend API)

pub mod coerce;
mod decoder;
mod encoder;
mod remote;
mod scanner;

pub use decoder::{
    decode_function_args, decode_params, decode_preview, decode_timelock_call, format_value,
    DecodedTimelockCall,
};
pub use encoder::{
    encode_args, encode_function_args, encode_signature_args, encode_timelock, encode_timelock_call,
};
pub use remote::AbiApiClient;
pub use scanner::AbiScanner;
