//! Payment schedule entry model and DTOs.

use serde::{Deserialize, Serialize};
use sitebook_core::payments::PaymentLine;
use sitebook_core::types::{Day, DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `payment_schedules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentSchedule {
    pub id: DbId,
    pub project_id: DbId,
    pub stage_name: String,
    pub amount: f64,
    pub expected_date: Day,
    pub actual_date: Option<Day>,
    pub is_paid: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&PaymentSchedule> for PaymentLine {
    fn from(p: &PaymentSchedule) -> Self {
        PaymentLine {
            amount: p.amount,
            expected_date: p.expected_date,
            is_paid: p.is_paid,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePaymentSchedule {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 255, message = "Stage name must be 1-255 characters"))]
    pub stage_name: String,
    pub amount: f64,
    pub expected_date: Day,
    pub actual_date: Option<Day>,
    pub is_paid: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePaymentSchedule {
    #[validate(length(min = 1, max = 255, message = "Stage name must be 1-255 characters"))]
    pub stage_name: Option<String>,
    pub amount: Option<f64>,
    pub expected_date: Option<Day>,
    pub actual_date: Option<Day>,
    pub is_paid: Option<bool>,
    pub notes: Option<String>,
}

/// Complete column values written by insert and update.
///
/// Handlers merge the request with the stored row (and resolve the
/// paid/actual-date pair) before calling the repository.
#[derive(Debug, Clone)]
pub struct PaymentScheduleValues {
    pub project_id: DbId,
    pub stage_name: String,
    pub amount: f64,
    pub expected_date: Day,
    pub actual_date: Option<Day>,
    pub is_paid: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentScheduleFilter {
    pub project_id: Option<DbId>,
}
