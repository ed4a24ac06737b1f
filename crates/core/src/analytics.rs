//! Roll-ups behind the workload dashboard.
//!
//! The repositories return flat rows (one per plan entry or per booked
//! distribution); these functions group them per project and line up two
//! dates side by side.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::types::DbId;

/// A user planned onto a project for the day being summarized.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAssignment {
    pub project_id: DbId,
    pub project_name: String,
    pub user_id: DbId,
}

/// Hours a user booked against a project.
#[derive(Debug, Clone, PartialEq)]
pub struct BookedHours {
    pub project_id: DbId,
    pub project_name: String,
    pub user_id: DbId,
    pub hours: f64,
}

/// Figures for one project on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectWorkload {
    pub project_id: DbId,
    pub project_name: String,
    pub planned_employees: i64,
    pub actual_employees: i64,
    pub actual_hours: f64,
}

/// Same figures for a compare date, plus differences (current minus earlier).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectWorkloadComparison {
    pub project_id: DbId,
    pub project_name: String,
    pub current: WorkloadFigures,
    pub compare: WorkloadFigures,
    pub planned_employees_diff: i64,
    pub actual_employees_diff: i64,
    pub actual_hours_diff: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkloadFigures {
    pub planned_employees: i64,
    pub actual_employees: i64,
    pub actual_hours: f64,
}

impl From<&ProjectWorkload> for WorkloadFigures {
    fn from(w: &ProjectWorkload) -> Self {
        Self {
            planned_employees: w.planned_employees,
            actual_employees: w.actual_employees,
            actual_hours: w.actual_hours,
        }
    }
}

#[derive(Default)]
struct Acc {
    name: String,
    planned: HashSet<DbId>,
    booked: HashSet<DbId>,
    hours: f64,
}

/// Group plan and booking rows per project.
///
/// `projects` are always listed (with zeros if idle); projects that only
/// appear in the rows are added. Sorted by project name, then id.
pub fn project_workload(
    projects: &[(DbId, String)],
    plans: &[PlannedAssignment],
    booked: &[BookedHours],
) -> Vec<ProjectWorkload> {
    let mut acc: BTreeMap<DbId, Acc> = BTreeMap::new();

    for (id, name) in projects {
        acc.entry(*id).or_default().name = name.clone();
    }
    for p in plans {
        let entry = acc.entry(p.project_id).or_default();
        if entry.name.is_empty() {
            entry.name = p.project_name.clone();
        }
        entry.planned.insert(p.user_id);
    }
    for b in booked {
        let entry = acc.entry(b.project_id).or_default();
        if entry.name.is_empty() {
            entry.name = b.project_name.clone();
        }
        entry.booked.insert(b.user_id);
        entry.hours += b.hours;
    }

    let mut out: Vec<ProjectWorkload> = acc
        .into_iter()
        .map(|(project_id, a)| ProjectWorkload {
            project_id,
            project_name: a.name,
            planned_employees: a.planned.len() as i64,
            actual_employees: a.booked.len() as i64,
            actual_hours: a.hours,
        })
        .collect();
    out.sort_by(|a, b| {
        a.project_name
            .cmp(&b.project_name)
            .then(a.project_id.cmp(&b.project_id))
    });
    out
}

/// Line up two summaries by project. A project missing on one side gets
/// zero figures there.
pub fn compare_project_workload(
    current: &[ProjectWorkload],
    earlier: &[ProjectWorkload],
) -> Vec<ProjectWorkloadComparison> {
    let mut rows: BTreeMap<DbId, (String, WorkloadFigures, WorkloadFigures)> = BTreeMap::new();
    for w in current {
        let row = rows
            .entry(w.project_id)
            .or_insert_with(|| (w.project_name.clone(), Default::default(), Default::default()));
        row.1 = w.into();
    }
    for w in earlier {
        let row = rows
            .entry(w.project_id)
            .or_insert_with(|| (w.project_name.clone(), Default::default(), Default::default()));
        row.2 = w.into();
    }

    let mut out: Vec<ProjectWorkloadComparison> = rows
        .into_iter()
        .map(|(project_id, (project_name, cur, cmp))| ProjectWorkloadComparison {
            project_id,
            project_name,
            current: cur,
            compare: cmp,
            planned_employees_diff: cur.planned_employees - cmp.planned_employees,
            actual_employees_diff: cur.actual_employees - cmp.actual_employees,
            actual_hours_diff: cur.actual_hours - cmp.actual_hours,
        })
        .collect();
    out.sort_by(|a, b| {
        a.project_name
            .cmp(&b.project_name)
            .then(a.project_id.cmp(&b.project_id))
    });
    out
}

/// Hours booked per project over a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectHours {
    pub project_id: DbId,
    pub project_name: String,
    pub total_hours: f64,
    pub employee_count: i64,
    /// Share of all booked hours in the range, percent, one decimal.
    pub share_percentage: f64,
}

/// Sum booked hours per project, largest first.
pub fn project_hours(booked: &[BookedHours]) -> Vec<ProjectHours> {
    let grand_total: f64 = booked.iter().map(|b| b.hours).sum();

    let mut acc: BTreeMap<DbId, Acc> = BTreeMap::new();
    for b in booked {
        let entry = acc.entry(b.project_id).or_default();
        entry.name = b.project_name.clone();
        entry.booked.insert(b.user_id);
        entry.hours += b.hours;
    }

    let mut out: Vec<ProjectHours> = acc
        .into_iter()
        .map(|(project_id, a)| ProjectHours {
            project_id,
            project_name: a.name,
            total_hours: a.hours,
            employee_count: a.booked.len() as i64,
            share_percentage: share(a.hours, grand_total),
        })
        .collect();
    out.sort_by(|a, b| {
        b.total_hours
            .total_cmp(&a.total_hours)
            .then(a.project_id.cmp(&b.project_id))
    });
    out
}

fn share(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (part / total * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(project_id: DbId, user_id: DbId) -> PlannedAssignment {
        PlannedAssignment {
            project_id,
            project_name: format!("P{project_id}"),
            user_id,
        }
    }

    fn booked(project_id: DbId, user_id: DbId, hours: f64) -> BookedHours {
        BookedHours {
            project_id,
            project_name: format!("P{project_id}"),
            user_id,
            hours,
        }
    }

    #[test]
    fn idle_projects_are_listed_with_zeros() {
        let projects = vec![(1, "Alpha".to_string()), (2, "Beta".to_string())];
        let out = project_workload(&projects, &[plan(1, 10)], &[]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].project_name, "Alpha");
        assert_eq!(out[0].planned_employees, 1);
        assert_eq!(out[1].project_name, "Beta");
        assert_eq!(out[1].planned_employees, 0);
        assert_eq!(out[1].actual_hours, 0.0);
    }

    #[test]
    fn employees_are_counted_once_per_project() {
        let projects = vec![(1, "Alpha".to_string())];
        let plans = vec![plan(1, 10), plan(1, 11)];
        let rows = vec![booked(1, 10, 3.0), booked(1, 10, 2.0), booked(1, 12, 4.0)];
        let out = project_workload(&projects, &plans, &rows);
        assert_eq!(out[0].planned_employees, 2);
        assert_eq!(out[0].actual_employees, 2);
        assert_eq!(out[0].actual_hours, 9.0);
    }

    #[test]
    fn projects_only_in_rows_are_added() {
        let out = project_workload(&[], &[], &[booked(7, 1, 2.0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].project_name, "P7");
    }

    #[test]
    fn comparison_aligns_by_project_and_diffs() {
        let now = project_workload(&[], &[plan(1, 1), plan(1, 2)], &[booked(1, 1, 8.0)]);
        let then = project_workload(&[], &[plan(1, 1), plan(2, 3)], &[booked(2, 3, 6.0)]);

        let cmp = compare_project_workload(&now, &then);
        assert_eq!(cmp.len(), 2);

        let p1 = &cmp[0];
        assert_eq!(p1.project_id, 1);
        assert_eq!(p1.current.planned_employees, 2);
        assert_eq!(p1.compare.planned_employees, 1);
        assert_eq!(p1.planned_employees_diff, 1);
        assert_eq!(p1.actual_hours_diff, 8.0);

        let p2 = &cmp[1];
        assert_eq!(p2.project_id, 2);
        assert_eq!(p2.current, WorkloadFigures::default());
        assert_eq!(p2.actual_hours_diff, -6.0);
        assert_eq!(p2.actual_employees_diff, -1);
    }

    #[test]
    fn project_hours_orders_by_total_and_computes_share() {
        let rows = vec![booked(1, 1, 2.0), booked(2, 1, 5.0), booked(2, 2, 1.0)];
        let out = project_hours(&rows);
        assert_eq!(out[0].project_id, 2);
        assert_eq!(out[0].total_hours, 6.0);
        assert_eq!(out[0].employee_count, 2);
        assert_eq!(out[0].share_percentage, 75.0);
        assert_eq!(out[1].share_percentage, 25.0);
    }

    #[test]
    fn project_hours_share_rounds_to_one_decimal() {
        let rows = vec![booked(1, 1, 1.0), booked(2, 1, 2.0)];
        let out = project_hours(&rows);
        assert_eq!(out[0].share_percentage, 66.7);
        assert_eq!(out[1].share_percentage, 33.3);
    }

    #[test]
    fn project_hours_empty() {
        assert!(project_hours(&[]).is_empty());
    }
}
