//! Per-field validation messages for the transaction form
//!
//! Empty values pass; required-ness is checked at submission.

use thiserror::Error;

const ADDRESS_LENGTH: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Address must start with 0x")]
    MissingPrefix,
    #[error("Address must be 42 characters")]
    WrongLength,
    #[error("Address must be a valid hex string")]
    NotHex,
    #[error("Please enter a valid positive number")]
    NotANumber,
}

pub fn validate_address(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Ok(());
    }
    let Some(hex) = value.strip_prefix("0x") else {
        return Err(FieldError::MissingPrefix);
    };
    if value.len() != ADDRESS_LENGTH {
        return Err(FieldError::WrongLength);
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FieldError::NotHex);
    }
    Ok(())
}

/// Wei amounts: decimal digits only
pub fn validate_value(value: &str) -> Result<(), FieldError> {
    if value.is_empty() || value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FieldError::NotANumber)
    }
}
