//! Timelock domain: operations, the bundled ABI and ETA handling

mod eta;
mod operation;

pub use eta::{
    default_eta, eta_from_local, eta_to_local, parse_eta, EtaError, Timeline, TimelineStatus,
    GRACE_PERIOD_SECS, MINIMUM_DELAY_SECS, SECONDS_PER_DAY,
};
pub use operation::{
    bundled_abi, timelock_method_options, ICompoundTimelock, TimelockCall, TimelockOperation,
    TIMELOCK_PARAM_NAMES, TIMELOCK_PARAM_TYPES,
};
