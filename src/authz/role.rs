//! Role hierarchy resolver
//!
//! Ranks and capability sets for the fixed role ladder. Every role
//! comparison in the engine goes through `rank()`/`has_capability()`;
//! nothing else compares role strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Role;

// ─────────────────────────────────────────────────────────────────
// Capabilities
// ─────────────────────────────────────────────────────────────────

/// Capabilities granted by roles. The mapping is fixed and total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read own profile and records
    ViewSelf,
    /// Read direct reports' profiles and shared records
    ViewTeam,
    /// Read profiles across the own department
    ViewDepartment,
    /// Read everything, company-wide (audit)
    ViewCompany,
    /// Edit own self-editable profile fields
    EditSelf,
    /// Edit direct reports' goals and entries
    EditTeam,
    /// Create users, change roles and salaries
    ManageUsers,
    /// System-level administration
    ManageSystem,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ViewSelf => write!(f, "view_self"),
            Capability::ViewTeam => write!(f, "view_team"),
            Capability::ViewDepartment => write!(f, "view_department"),
            Capability::ViewCompany => write!(f, "view_company"),
            Capability::EditSelf => write!(f, "edit_self"),
            Capability::EditTeam => write!(f, "edit_team"),
            Capability::ManageUsers => write!(f, "manage_users"),
            Capability::ManageSystem => write!(f, "manage_system"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Role Resolver
// ─────────────────────────────────────────────────────────────────

impl Role {
    /// Numeric rank, strictly increasing up the ladder
    pub fn rank(self) -> u8 {
        match self {
            Role::Employee => 0,
            Role::Manager => 1,
            Role::Admin => 2,
            Role::SuperAdmin => 3,
        }
    }

    /// Whether this role ranks at or above `other`
    pub fn at_least(self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    /// The fixed capability set for this role
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Employee => &[Capability::ViewSelf, Capability::EditSelf],
            Role::Manager => &[
                Capability::ViewSelf,
                Capability::EditSelf,
                Capability::ViewTeam,
                Capability::EditTeam,
            ],
            Role::Admin => &[
                Capability::ViewSelf,
                Capability::EditSelf,
                Capability::ViewTeam,
                Capability::EditTeam,
                Capability::ViewDepartment,
                Capability::ManageUsers,
            ],
            Role::SuperAdmin => &[
                Capability::ViewSelf,
                Capability::EditSelf,
                Capability::ViewTeam,
                Capability::EditTeam,
                Capability::ViewDepartment,
                Capability::ViewCompany,
                Capability::ManageUsers,
                Capability::ManageSystem,
            ],
        }
    }

    /// Whether the role's capability set contains `cap`
    pub fn has_capability(self, cap: Capability) -> bool {
        self.capabilities().contains(&cap)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_strictly_increasing() {
        let ranks: Vec<u8> = Role::all().iter().map(|r| r.rank()).collect();
        for window in ranks.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn test_rank_values() {
        assert_eq!(Role::Employee.rank(), 0);
        assert_eq!(Role::Manager.rank(), 1);
        assert_eq!(Role::Admin.rank(), 2);
        assert_eq!(Role::SuperAdmin.rank(), 3);
    }

    #[test]
    fn test_employee_capabilities() {
        let caps = Role::Employee.capabilities();
        assert_eq!(caps, &[Capability::ViewSelf, Capability::EditSelf]);
        assert!(!Role::Employee.has_capability(Capability::ViewTeam));
        assert!(!Role::Employee.has_capability(Capability::ManageUsers));
    }

    #[test]
    fn test_manager_capabilities() {
        assert!(Role::Manager.has_capability(Capability::ViewTeam));
        assert!(Role::Manager.has_capability(Capability::EditTeam));
        assert!(!Role::Manager.has_capability(Capability::ViewDepartment));
        assert!(!Role::Manager.has_capability(Capability::ManageUsers));
    }

    #[test]
    fn test_admin_capabilities() {
        assert!(Role::Admin.has_capability(Capability::ViewDepartment));
        assert!(Role::Admin.has_capability(Capability::ManageUsers));
        assert!(!Role::Admin.has_capability(Capability::ViewCompany));
        assert!(!Role::Admin.has_capability(Capability::ManageSystem));
    }

    #[test]
    fn test_super_admin_has_all_capabilities() {
        for cap in [
            Capability::ViewSelf,
            Capability::ViewTeam,
            Capability::ViewDepartment,
            Capability::ViewCompany,
            Capability::EditSelf,
            Capability::EditTeam,
            Capability::ManageUsers,
            Capability::ManageSystem,
        ] {
            assert!(Role::SuperAdmin.has_capability(cap), "missing {}", cap);
        }
    }

    #[test]
    fn test_capability_sets_grow_with_rank() {
        for window in Role::all().windows(2) {
            let lower = window[0].capabilities();
            let higher = window[1].capabilities();
            for cap in lower {
                assert!(
                    higher.contains(cap),
                    "{} lost capability {} over {}",
                    window[1],
                    cap,
                    window[0]
                );
            }
            assert!(higher.len() > lower.len());
        }
    }

    #[test]
    fn test_at_least() {
        assert!(Role::Admin.at_least(Role::Manager));
        assert!(Role::Manager.at_least(Role::Manager));
        assert!(!Role::Employee.at_least(Role::Manager));
    }
}
