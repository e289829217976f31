//! Transaction creation form
//!
//! Selections flow `timelock → method → ABI → function → arguments`.
//! Changing the ABI clears the function and its arguments; changing the
//! function clears the arguments. Calldata and the preview are recomputed
//! from the current state on every call.

mod submit;
mod validate;

pub use submit::{SubmitError, TransactionPayload, TransactionSender};
pub use validate::{validate_address, validate_value, FieldError};

use std::fmt;

use alloy_primitives::{Address, Bytes, TxHash};
use chrono::{DateTime, TimeZone};

use crate::core::{CodecError, Result, Session, TimelockContract};
use crate::domain::abi::{resolve_function, AbiLibrary, EncodedCall, FunctionEntry, Param};
use crate::domain::timelock::{default_eta, TimelockOperation};
use crate::infrastructure::abi::{
    coerce::coerce_uint, encode_function_args, encode_signature_args, encode_timelock_call,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    timelock_id: Option<u64>,
    timelock_method: String,
    target: String,
    value: String,
    abi_id: Option<u64>,
    function_value: String,
    eta: Option<u64>,
    argument_values: Vec<String>,
}

impl TransactionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh form with the default ETA (two days ahead, 14:00 local)
    pub fn with_default_eta<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            eta: default_eta(now),
            ..Self::default()
        }
    }

    // ---- selections ----

    pub fn select_timelock(&mut self, id: Option<u64>) {
        self.timelock_id = id;
    }

    pub fn select_method(&mut self, method: impl Into<String>) {
        self.timelock_method = method.into();
    }

    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = target.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_eta(&mut self, eta: Option<u64>) {
        self.eta = eta;
    }

    pub fn select_abi(&mut self, abi_id: Option<u64>) {
        self.abi_id = abi_id;
        self.function_value.clear();
        self.argument_values.clear();
    }

    pub fn select_function(&mut self, function_value: impl Into<String>) {
        self.function_value = function_value.into();
        self.argument_values.clear();
    }

    /// Set one argument, growing the list with empty values as needed
    pub fn set_argument(&mut self, index: usize, value: impl Into<String>) {
        if self.argument_values.len() <= index {
            self.argument_values.resize(index + 1, String::new());
        }
        self.argument_values[index] = value.into();
    }

    // ---- accessors ----

    pub fn timelock_id(&self) -> Option<u64> {
        self.timelock_id
    }

    pub fn timelock_method(&self) -> &str {
        &self.timelock_method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn abi_id(&self) -> Option<u64> {
        self.abi_id
    }

    pub fn function_value(&self) -> &str {
        &self.function_value
    }

    pub fn eta(&self) -> Option<u64> {
        self.eta
    }

    pub fn argument_values(&self) -> &[String] {
        &self.argument_values
    }

    pub fn operation(&self) -> Option<TimelockOperation> {
        self.timelock_method.parse().ok()
    }

    pub fn timelock<'s>(&self, session: &'s Session) -> Option<&'s TimelockContract> {
        self.timelock_id.and_then(|id| session.timelock(id))
    }

    /// The selected function of the selected ABI
    pub fn function_entry(&self, library: &AbiLibrary) -> Option<FunctionEntry> {
        let record = library.get(self.abi_id?)?;
        let entries = record.entries().ok()?;
        resolve_function(&entries, &self.function_value).cloned()
    }

    /// Inputs to render argument fields for; empty when the function is unknown
    pub fn argument_params(&self, library: &AbiLibrary) -> Vec<Param> {
        self.function_entry(library)
            .map(|function| function.inputs)
            .unwrap_or_default()
    }

    /// Signature passed to the timelock: the canonical form of the resolved
    /// function, or the raw selection when it cannot be resolved.
    pub fn inner_signature(&self, library: &AbiLibrary) -> String {
        self.function_entry(library)
            .and_then(|function| function.canonical_signature().ok())
            .unwrap_or_else(|| self.function_value.clone())
    }

    /// Per-field messages for the free-text target and value inputs
    pub fn field_errors(&self) -> Vec<(&'static str, FieldError)> {
        let checks = [
            ("target", validate_address(self.target.trim())),
            ("value", validate_value(self.value.trim())),
        ];
        checks
            .into_iter()
            .filter_map(|(field, check)| check.err().map(|error| (field, error)))
            .collect()
    }

    /// Value actually transferred: the form value for `executeTransaction`,
    /// otherwise zero.
    pub fn transaction_value(&self) -> String {
        match self.operation() {
            Some(op) if op.transfers_value() && !self.value.trim().is_empty() => {
                self.value.trim().to_string()
            }
            _ => "0".to_string(),
        }
    }

    // ---- encoding ----

    /// Encode the selected function's arguments, reporting why it fails
    pub fn encode_target(&self, library: &AbiLibrary) -> Result<Bytes> {
        if self.function_value.is_empty() {
            return Err(CodecError::SignatureNotFound(String::new()));
        }
        match self.function_entry(library) {
            Some(function) => encode_function_args(&function, &self.argument_values),
            None => encode_signature_args(&self.function_value, &self.argument_values),
        }
    }

    /// Encode the timelock call, reporting why it fails
    pub fn encode_timelock(&self, library: &AbiLibrary) -> Result<Bytes> {
        let inner = self.encode_target(library)?;
        let operation = self
            .operation()
            .ok_or_else(|| CodecError::SignatureNotFound(self.timelock_method.clone()))?;
        let eta = self
            .eta
            .ok_or_else(|| CodecError::encoding("eta is not set"))?;
        let value = match self.value.trim() {
            "" => "0",
            value => value,
        };

        encode_timelock_call(
            operation,
            &self.target,
            value,
            &self.inner_signature(library),
            &hex::encode(&inner),
            eta,
        )
    }

    /// Encoded arguments of the selected function
    pub fn target_calldata(&self, library: &AbiLibrary) -> EncodedCall {
        self.encode_target(library).into()
    }

    /// Full calldata for the timelock contract
    pub fn timelock_calldata(&self, library: &AbiLibrary) -> EncodedCall {
        self.encode_timelock(library).into()
    }

    pub fn preview(&self, session: &Session, library: &AbiLibrary) -> TransactionPreview {
        TransactionPreview {
            from: session.address(),
            to: self.timelock(session).map(|t| t.contract_address),
            value: self.transaction_value(),
            calldata: self.timelock_calldata(library).data().map(str::to_string),
        }
    }

    // ---- submission ----

    /// Validate the form against the session and build the wallet payload
    pub fn payload(
        &self,
        session: &Session,
        library: &AbiLibrary,
    ) -> Result<TransactionPayload, SubmitError> {
        if !session.is_connected() {
            return Err(SubmitError::WalletNotConnected);
        }
        let chain_id = session.chain_id().ok_or(SubmitError::NetworkNotSelected)?;

        let timelock = self.timelock(session);
        let mut missing = Vec::new();
        if timelock.is_none() {
            missing.push("timelock");
        }
        if self.target.trim().is_empty() {
            missing.push("target");
        }
        if self.function_value.is_empty() {
            missing.push("function");
        }
        if self.eta.is_none() {
            missing.push("eta");
        }
        let Some(timelock) = timelock.filter(|_| missing.is_empty()) else {
            return Err(SubmitError::MissingFields(missing));
        };

        if timelock.chain_id != chain_id {
            return Err(SubmitError::WrongChain {
                expected: timelock.chain_id,
                actual: chain_id,
            });
        }

        if let Some((field, error)) = self.field_errors().into_iter().next() {
            return Err(SubmitError::InvalidField { field, error });
        }

        let calldata = self.encode_timelock(library).map_err(|err| {
            tracing::debug!(error = %err, "timelock calldata unavailable");
            SubmitError::CalldataNotGenerated
        })?;
        let value = coerce_uint(&self.transaction_value(), 256)
            .map_err(|err| SubmitError::InvalidValue(err.to_string()))?;

        Ok(TransactionPayload {
            to_address: timelock.contract_address,
            calldata,
            value,
        })
    }

    /// Hand the payload to the wallet
    pub async fn submit<S>(
        &self,
        session: &Session,
        library: &AbiLibrary,
        sender: &S,
    ) -> Result<TxHash, SubmitError>
    where
        S: TransactionSender + ?Sized,
    {
        let payload = self.payload(session, library)?;
        tracing::info!(
            to = %payload.to_address,
            value = %payload.value,
            method = %self.timelock_method,
            "submitting timelock transaction"
        );

        sender.send_transaction(&payload).await.map_err(|err| {
            let err = SubmitError::from_wallet(&err);
            tracing::warn!(error = %err, "timelock transaction not sent");
            err
        })
    }
}

/// The four-line preview block shown before submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPreview {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value: String,
    pub calldata: Option<String>,
}

impl fmt::Display for TransactionPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self.from.map(|a| a.to_checksum(None));
        let to = self.to.map(|a| a.to_checksum(None));
        writeln!(f, "from:     {}", from.as_deref().unwrap_or("Not connected"))?;
        writeln!(f, "to:       {}", to.as_deref().unwrap_or("Not selected"))?;
        writeln!(f, "value:    {}", self.value)?;
        write!(f, "calldata: {}", self.calldata.as_deref().unwrap_or("Not generated"))
    }
}
