//! Payment schedule rules and the per-project payment summary.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Day;

/// Amount must be a positive, finite number.
pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "amount must be greater than 0, got {amount}"
        )));
    }
    Ok(())
}

/// Resolve `(is_paid, actual_date)` after an update.
///
/// Marking an entry paid without a date stamps `today`; marking it unpaid
/// clears the date.
pub fn resolve_paid_state(
    is_paid: bool,
    actual_date: Option<Day>,
    today: Day,
) -> (bool, Option<Day>) {
    if is_paid {
        (true, Some(actual_date.unwrap_or(today)))
    } else {
        (false, None)
    }
}

/// The fields of a schedule entry the summary needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentLine {
    pub amount: f64,
    pub expected_date: Day,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub entry_count: i64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub outstanding_amount: f64,
    pub overdue_count: i64,
    pub overdue_amount: f64,
}

/// An unpaid entry whose expected date lies before `today` is overdue.
pub fn summarize_payments(lines: &[PaymentLine], today: Day) -> PaymentSummary {
    lines.iter().fold(PaymentSummary::default(), |mut s, line| {
        s.entry_count += 1;
        s.total_amount += line.amount;
        if line.is_paid {
            s.paid_amount += line.amount;
        } else {
            s.outstanding_amount += line.amount;
            if line.expected_date < today {
                s.overdue_count += 1;
                s.overdue_amount += line.amount;
            }
        }
        s
    })
}
