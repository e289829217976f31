//! Encode report: inner calldata, timelock calldata and the preview block

use super::ToolResult;
use crate::core::Session;
use crate::domain::abi::AbiLibrary;
use crate::domain::timelock::{Timeline, GRACE_PERIOD_SECS, MINIMUM_DELAY_SECS};
use crate::modules::form::TransactionForm;

fn hex_or_error<E: std::fmt::Display>(result: Result<alloy_primitives::Bytes, E>) -> String {
    match result {
        Ok(bytes) => format!("0x{}", hex::encode(&bytes)),
        Err(err) => format!("error: {err}"),
    }
}

/// Whether a queue at `now` would accept the ETA under the minimum delay
fn eta_check(eta: u64, now: u64) -> &'static str {
    if Timeline::new(eta, GRACE_PERIOD_SECS).satisfies_delay(now, MINIMUM_DELAY_SECS) {
        "ok"
    } else {
        "earlier than now + minimum delay (2 days)"
    }
}

/// Summarize the form's encoding as of `now` (UNIX seconds)
pub fn encode(
    form: &TransactionForm,
    session: &Session,
    library: &AbiLibrary,
    now: u64,
) -> ToolResult {
    let preview = form.preview(session, library);
    let mut result = ToolResult::new("Timelock Encode")
        .add("function", form.inner_signature(library))
        .add("target calldata", hex_or_error(form.encode_target(library)))
        .add("method", form.timelock_method())
        .add("timelock calldata", hex_or_error(form.encode_timelock(library)));

    for (field, error) in form.field_errors() {
        result = result.add(format!("invalid {field}"), error.to_string());
    }
    if let Some(eta) = form.eta() {
        result = result.add("eta", eta.to_string()).add("eta check", eta_check(eta, now));
    }

    preview
        .to_string()
        .lines()
        .filter_map(|line| line.split_once(':'))
        .fold(result, |result, (label, value)| {
            result.add(format!("preview {label}"), value.trim())
        })
}
