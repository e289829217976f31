pub mod error;
pub mod session;

pub use error::{CodecError, Result};
pub use session::{Session, TimelockContract, WalletConnection};
