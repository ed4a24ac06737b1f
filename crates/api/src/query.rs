//! Query-string shapes used by more than one handler.

use serde::Deserialize;
use sitebook_core::types::Day;

/// `?limit=&offset=`, clamped into a `Page` by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?start_date=&end_date=` for "my" listings.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
}
