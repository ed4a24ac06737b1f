//! Project-level rules shared by create and update.

use crate::error::CoreError;
use crate::types::Day;

/// A project may not end before it starts. Either date may be unset.
pub fn validate_date_range(start: Option<Day>, end: Option<Day>) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CoreError::Validation(format!(
                "end_date ({end}) must not be before start_date ({start})"
            )));
        }
    }
    Ok(())
}

/// Contract amount, when given, cannot be negative.
pub fn validate_contract_amount(amount: Option<f64>) -> Result<(), CoreError> {
    match amount {
        Some(a) if !a.is_finite() || a < 0.0 => Err(CoreError::Validation(format!(
            "contract_amount must be a non-negative number, got {a}"
        ))),
        _ => Ok(()),
    }
}
