//! User roles and the permission predicates the route guards are built from.
//!
//! Role names and ids must match the seed data in
//! `20260301000001_create_roles_and_users.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_TRIAL: &str = "trial";

/// The fixed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Employee,
    Trial,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Employee, Role::Trial];

    /// Database name value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Manager => ROLE_MANAGER,
            Self::Employee => ROLE_EMPLOYEE,
            Self::Trial => ROLE_TRIAL,
        }
    }

    /// Seeded `roles.id` for this role.
    pub fn id(self) -> i16 {
        match self {
            Self::Admin => 1,
            Self::Manager => 2,
            Self::Employee => 3,
            Self::Trial => 4,
        }
    }

    /// Parse from the `roles.name` column or a query parameter.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_MANAGER => Ok(Self::Manager),
            ROLE_EMPLOYEE => Ok(Self::Employee),
            ROLE_TRIAL => Ok(Self::Trial),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: admin, manager, employee, trial"
            ))),
        }
    }

    pub fn from_id(id: i16) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| CoreError::Validation(format!("Unknown role id {id}")))
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Managers and admins may change project data.
    pub fn is_manager_or_admin(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Read access to management views (analytics, payments, team workload).
    ///
    /// Trial accounts get the manager's read-only view; admins always pass.
    pub fn is_manager_or_trial(self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Trial)
    }

    pub fn is_not_trial(self) -> bool {
        self != Self::Trial
    }

    /// Whether project listings are unrestricted for this role.
    ///
    /// Employees and trial users only see projects they are assigned to.
    pub fn sees_all_projects(self) -> bool {
        self.is_manager_or_admin()
    }

    /// Whether a user with this role may be planned onto project work or
    /// show up in the work-hours report.
    pub fn tracks_workload(self) -> bool {
        matches!(self, Self::Manager | Self::Employee)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
