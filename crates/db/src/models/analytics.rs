//! Flat rows read by the analytics queries, converted into the
//! `sitebook_core` aggregation inputs.

use serde::Serialize;
use sitebook_core::analytics::{BookedHours, PlannedAssignment};
use sitebook_core::types::{Day, DbId};
use sitebook_core::workload::ReportedDay;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PlannedRow {
    pub project_id: DbId,
    pub project_name: String,
    pub user_id: DbId,
}

impl From<PlannedRow> for PlannedAssignment {
    fn from(r: PlannedRow) -> Self {
        PlannedAssignment {
            project_id: r.project_id,
            project_name: r.project_name,
            user_id: r.user_id,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct BookedRow {
    pub project_id: DbId,
    pub project_name: String,
    pub user_id: DbId,
    pub hours: f64,
}

impl From<BookedRow> for BookedHours {
    fn from(r: BookedRow) -> Self {
        BookedHours {
            project_id: r.project_id,
            project_name: r.project_name,
            user_id: r.user_id,
            hours: r.hours,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReportedDayRow {
    pub user_id: DbId,
    pub work_date: Day,
    pub hours_worked: f64,
}

impl From<ReportedDayRow> for ReportedDay {
    fn from(r: ReportedDayRow) -> Self {
        ReportedDay {
            user_id: r.user_id,
            work_date: r.work_date,
            hours_worked: r.hours_worked,
        }
    }
}

/// `(name, count)` pair from a GROUP BY over a lookup table.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub count: i64,
}
