//! ETA conversion and execution window
//!
//! The ETA is a whole-second UNIX timestamp. Local date/time input is read
//! in the caller's time zone and floored to seconds.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Compound `GRACE_PERIOD`
pub const GRACE_PERIOD_SECS: u64 = 14 * SECONDS_PER_DAY;
/// Compound `MINIMUM_DELAY`
pub const MINIMUM_DELAY_SECS: u64 = 2 * SECONDS_PER_DAY;

const DEFAULT_OFFSET_DAYS: i64 = 2;
const DEFAULT_HOUR: u32 = 14;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EtaError {
    #[error("invalid date/time '{0}', expected YYYY-MM-DDTHH:MM[:SS]")]
    InvalidFormat(String),
    #[error("local time '{0}' does not exist in this time zone")]
    NonexistentLocalTime(String),
    #[error("date/time '{0}' is before the UNIX epoch")]
    BeforeEpoch(String),
}

/// Parse a local `datetime-local` style value into epoch seconds
/// (`floor(millis / 1000)`).
pub fn eta_from_local<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<u64, EtaError> {
    let input = input.trim();
    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| EtaError::InvalidFormat(input.to_string()))?;

    // ambiguous wall-clock times (DST fall-back) take the earlier instant
    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| EtaError::NonexistentLocalTime(input.to_string()))?;

    let secs = local.timestamp_millis().div_euclid(1000);
    u64::try_from(secs).map_err(|_| EtaError::BeforeEpoch(input.to_string()))
}

/// Accepts either epoch seconds or a local date/time
pub fn parse_eta<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<u64, EtaError> {
    match input.trim().parse::<u64>() {
        Ok(secs) => Ok(secs),
        Err(_) => eta_from_local(input, tz),
    }
}

/// Format epoch seconds for a `datetime-local` field; seconds are shown
/// only when non-zero so minute-precision values stay in input format.
pub fn eta_to_local<Tz: TimeZone>(eta: u64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let secs = i64::try_from(eta).ok()?;
    let local = tz.timestamp_opt(secs, 0).single()?;
    let fmt = if secs % 60 == 0 { LOCAL_FORMATS[0] } else { LOCAL_FORMATS[1] };
    Some(local.format(fmt).to_string())
}

/// Default ETA offered by a fresh form: two days ahead at 14:00 local time
pub fn default_eta<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<u64> {
    let day = now.date_naive() + Duration::days(DEFAULT_OFFSET_DAYS);
    let naive = day.and_hms_opt(DEFAULT_HOUR, 0, 0)?;
    let local = now.timezone().from_local_datetime(&naive).earliest()?;
    u64::try_from(local.timestamp()).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStatus {
    /// Before the ETA
    Pending,
    /// Inside `[eta, eta + grace period]`
    Ready,
    Expired,
}

/// Execution window of a queued transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub eta: u64,
    pub grace_period: u64,
}

impl Timeline {
    pub fn new(eta: u64, grace_period: u64) -> Self {
        Self { eta, grace_period }
    }

    pub fn executable_at(&self) -> u64 {
        self.eta
    }

    pub fn expires_at(&self) -> u64 {
        self.eta.saturating_add(self.grace_period)
    }

    pub fn status(&self, now: u64) -> TimelineStatus {
        if now < self.executable_at() {
            TimelineStatus::Pending
        } else if now <= self.expires_at() {
            TimelineStatus::Ready
        } else {
            TimelineStatus::Expired
        }
    }

    /// `queueTransaction` requires `eta >= now + delay`
    pub fn satisfies_delay(&self, now: u64, delay: u64) -> bool {
        self.eta >= now.saturating_add(delay)
    }
}
