//! Workload planning and actual-hours rules, plus the work-hours report
//! arithmetic (expected vs. actual hours per employee).

use std::collections::HashSet;

use chrono::{Datelike, Weekday};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Day, DbId};

/// Default length of a working day in hours.
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// Upper bound for hours reported on a single day.
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

/// Tolerance used when comparing summed distribution hours.
const HOURS_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Date ranges
// ---------------------------------------------------------------------------

/// Reject ranges where `end` precedes `start`. Any length is accepted.
pub fn validate_report_range(start: Day, end: Day) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "end_date ({end}) must not be before start_date ({start})"
        )));
    }
    Ok(())
}

/// Count Monday-to-Friday days in `[start, end]`, both ends inclusive.
///
/// Returns 0 when `end < start`.
pub fn working_days(start: Day, end: Day) -> u32 {
    if end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

/// Baseline hours for a range: working days times the configured day length.
pub fn expected_hours(start: Day, end: Day, hours_per_day: f64) -> f64 {
    f64::from(working_days(start, end)) * hours_per_day
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Plans are made for today or later; past days are history.
pub fn validate_plan_date(date: Day, today: Day) -> Result<(), CoreError> {
    if date < today {
        return Err(CoreError::Validation(format!(
            "Workload can only be planned for today or a future date, got {date}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Actuals
// ---------------------------------------------------------------------------

/// One slice of a day's hours booked against a project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursSplit {
    pub project_id: DbId,
    pub hours: f64,
}

/// Actual hours cannot be reported ahead of time.
pub fn validate_actual_date(date: Day, today: Day) -> Result<(), CoreError> {
    if date > today {
        return Err(CoreError::Validation(format!(
            "Worked hours cannot be reported for a future date, got {date}"
        )));
    }
    Ok(())
}

/// `hours_worked` must be in `(0, 24]`.
pub fn validate_hours_worked(hours: f64) -> Result<(), CoreError> {
    if !hours.is_finite() || hours <= 0.0 || hours > MAX_HOURS_PER_DAY {
        return Err(CoreError::Validation(format!(
            "hours_worked must be greater than 0 and at most {MAX_HOURS_PER_DAY}, got {hours}"
        )));
    }
    Ok(())
}

/// Check a per-project split against the day's total.
///
/// Every slice needs positive hours, a project may appear once, and the
/// slices together cannot exceed `hours_worked`.
pub fn validate_distributions(hours_worked: f64, splits: &[HoursSplit]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(splits.len());
    let mut total = 0.0;
    for split in splits {
        if !split.hours.is_finite() || split.hours <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Distribution hours for project {} must be positive",
                split.project_id
            )));
        }
        if !seen.insert(split.project_id) {
            return Err(CoreError::Validation(format!(
                "Project {} appears more than once in distributions",
                split.project_id
            )));
        }
        total += split.hours;
    }
    if total > hours_worked + HOURS_EPSILON {
        return Err(CoreError::Validation(format!(
            "Distributed hours ({total}) exceed hours worked ({hours_worked})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Work-hours report
// ---------------------------------------------------------------------------

/// Hours reported by one user on one day, as read from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedDay {
    pub user_id: DbId,
    pub work_date: Day,
    pub hours_worked: f64,
}

/// Per-employee line of the work-hours report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeHours {
    pub user_id: DbId,
    pub full_name: String,
    pub total_hours_worked: f64,
    pub days_reported: u32,
    pub working_days: u32,
    pub expected_hours: f64,
    pub deviation: f64,
    pub deviation_percentage: i64,
}

/// `round(deviation / expected * 100)`, or 0 when nothing was expected.
pub fn deviation_percentage(deviation: f64, expected: f64) -> i64 {
    if expected == 0.0 {
        return 0;
    }
    (deviation / expected * 100.0).round() as i64
}

/// Build report lines for `employees` (id, name) from the reported days.
///
/// Every employee gets a line, including those who reported nothing; rows
/// belonging to users outside `employees` are ignored. Output keeps the
/// order of `employees`.
pub fn summarize_employee_hours(
    employees: &[(DbId, String)],
    days: &[ReportedDay],
    start: Day,
    end: Day,
    hours_per_day: f64,
) -> Vec<EmployeeHours> {
    let working = working_days(start, end);
    let expected = f64::from(working) * hours_per_day;

    employees
        .iter()
        .map(|(user_id, full_name)| {
            let mine = days
                .iter()
                .filter(|d| d.user_id == *user_id && d.work_date >= start && d.work_date <= end);
            let (total, count) = mine.fold((0.0_f64, 0_u32), |(sum, n), d| {
                (sum + d.hours_worked, n + 1)
            });
            let deviation = total - expected;
            EmployeeHours {
                user_id: *user_id,
                full_name: full_name.clone(),
                total_hours_worked: total,
                days_reported: count,
                working_days: working,
                expected_hours: expected,
                deviation,
                deviation_percentage: deviation_percentage(deviation, expected),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn working_days_skips_weekends() {
        // 2026-03-02 is a Monday.
        assert_eq!(working_days(day(2026, 3, 2), day(2026, 3, 8)), 5);
        assert_eq!(working_days(day(2026, 3, 2), day(2026, 3, 15)), 10);
    }

    #[test]
    fn working_days_single_day() {
        assert_eq!(working_days(day(2026, 3, 4), day(2026, 3, 4)), 1);
        // Saturday.
        assert_eq!(working_days(day(2026, 3, 7), day(2026, 3, 7)), 0);
    }

    #[test]
    fn working_days_inverted_range_is_zero() {
        assert_eq!(working_days(day(2026, 3, 8), day(2026, 3, 2)), 0);
    }

    #[test]
    fn expected_hours_uses_day_length() {
        assert_eq!(expected_hours(day(2026, 3, 2), day(2026, 3, 6), 8.0), 40.0);
        assert_eq!(expected_hours(day(2026, 3, 2), day(2026, 3, 6), 6.5), 32.5);
    }

    #[test]
    fn report_range_rejects_inverted_dates() {
        assert_matches!(
            validate_report_range(day(2026, 3, 5), day(2026, 3, 1)),
            Err(CoreError::Validation(_))
        );
        assert!(validate_report_range(day(2026, 3, 1), day(2026, 3, 1)).is_ok());
    }

    #[test]
    fn report_range_accepts_multi_year_spans() {
        assert!(validate_report_range(day(2024, 1, 1), day(2025, 6, 30)).is_ok());
    }

    #[test]
    fn plan_date_must_not_be_in_the_past() {
        let today = day(2026, 3, 10);
        assert!(validate_plan_date(today, today).is_ok());
        assert!(validate_plan_date(day(2026, 3, 11), today).is_ok());
        assert!(validate_plan_date(day(2026, 3, 9), today).is_err());
    }

    #[test]
    fn actual_date_must_not_be_in_the_future() {
        let today = day(2026, 3, 10);
        assert!(validate_actual_date(today, today).is_ok());
        assert!(validate_actual_date(day(2026, 3, 11), today).is_err());
    }

    #[test]
    fn hours_worked_bounds() {
        assert!(validate_hours_worked(8.0).is_ok());
        assert!(validate_hours_worked(24.0).is_ok());
        assert!(validate_hours_worked(0.0).is_err());
        assert!(validate_hours_worked(-1.0).is_err());
        assert!(validate_hours_worked(24.5).is_err());
        assert!(validate_hours_worked(f64::NAN).is_err());
    }

    #[test]
    fn distributions_may_not_exceed_total() {
        let splits = [
            HoursSplit { project_id: 1, hours: 5.0 },
            HoursSplit { project_id: 2, hours: 3.0 },
        ];
        assert!(validate_distributions(8.0, &splits).is_ok());
        assert!(validate_distributions(7.5, &splits).is_err());
    }

    #[test]
    fn distributions_tolerate_float_noise() {
        let splits = [
            HoursSplit { project_id: 1, hours: 0.1 },
            HoursSplit { project_id: 2, hours: 0.2 },
        ];
        assert!(validate_distributions(0.3, &splits).is_ok());
    }

    #[test]
    fn distributions_reject_duplicates_and_non_positive() {
        let dup = [
            HoursSplit { project_id: 1, hours: 1.0 },
            HoursSplit { project_id: 1, hours: 1.0 },
        ];
        assert!(validate_distributions(8.0, &dup).is_err());

        let zero = [HoursSplit { project_id: 1, hours: 0.0 }];
        assert!(validate_distributions(8.0, &zero).is_err());
    }

    #[test]
    fn deviation_percentage_rounds() {
        assert_eq!(deviation_percentage(-4.0, 40.0), -10);
        assert_eq!(deviation_percentage(1.0, 3.0), 33);
        assert_eq!(deviation_percentage(2.0, 3.0), 67);
        assert_eq!(deviation_percentage(5.0, 0.0), 0);
    }

    #[test]
    fn summary_includes_silent_employees() {
        let employees = vec![(1, "Anna".to_string()), (2, "Boris".to_string())];
        let days = vec![
            ReportedDay { user_id: 1, work_date: day(2026, 3, 2), hours_worked: 9.0 },
            ReportedDay { user_id: 1, work_date: day(2026, 3, 3), hours_worked: 7.0 },
            // Outside the range, ignored.
            ReportedDay { user_id: 1, work_date: day(2026, 3, 9), hours_worked: 8.0 },
            // Unknown user, ignored.
            ReportedDay { user_id: 3, work_date: day(2026, 3, 2), hours_worked: 8.0 },
        ];

        let report = summarize_employee_hours(&employees, &days, day(2026, 3, 2), day(2026, 3, 6), 8.0);

        assert_eq!(report.len(), 2);
        let anna = &report[0];
        assert_eq!(anna.total_hours_worked, 16.0);
        assert_eq!(anna.days_reported, 2);
        assert_eq!(anna.working_days, 5);
        assert_eq!(anna.expected_hours, 40.0);
        assert_eq!(anna.deviation, -24.0);
        assert_eq!(anna.deviation_percentage, -60);

        let boris = &report[1];
        assert_eq!(boris.total_hours_worked, 0.0);
        assert_eq!(boris.days_reported, 0);
        assert_eq!(boris.deviation_percentage, -100);
    }

    #[test]
    fn weekend_only_range_has_zero_percentage() {
        let employees = vec![(1, "Anna".to_string())];
        let days = vec![ReportedDay { user_id: 1, work_date: day(2026, 3, 7), hours_worked: 4.0 }];
        let report = summarize_employee_hours(&employees, &days, day(2026, 3, 7), day(2026, 3, 8), 8.0);
        assert_eq!(report[0].expected_hours, 0.0);
        assert_eq!(report[0].deviation, 4.0);
        assert_eq!(report[0].deviation_percentage, 0);
    }
}
