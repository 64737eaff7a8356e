//! User and role definitions
//!
//! Users form a tree through `manager_id` back-references. Roles are a
//! closed ladder; anything outside it is rejected at the parsing
//! boundary rather than defaulted to the lowest tier.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────

/// Role tiers, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Regular employee
    Employee,
    /// People manager with direct reports
    Manager,
    /// Department-level administrator
    Admin,
    /// System-wide administrator
    SuperAdmin,
}

impl Role {
    /// Get all roles, lowest rank first
    pub fn all() -> &'static [Role] {
        &[Role::Employee, Role::Manager, Role::Admin, Role::SuperAdmin]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Manager => write!(f, "manager"),
            Role::Admin => write!(f, "admin"),
            Role::SuperAdmin => write!(f, "super-admin"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Parse a role string. Unknown values are a hard error, never a
    /// silent fall-through to `Employee`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            "super-admin" => Ok(Role::SuperAdmin),
            other => Err(Error::unknown_role(other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────

/// Account status. Users are soft-lifecycled: status toggles, records
/// are never hard-deleted while history references the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// A user in the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Work email address
    pub email: String,

    /// Role tier
    pub role: Role,

    /// Department name
    pub department: String,

    /// Job title
    pub position: String,

    /// Direct manager's user id (None for top of the tree)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,

    /// Quality Index Score, 0-100
    pub qis: u8,

    /// Account status
    pub status: UserStatus,

    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Office location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Free-text professional notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_notes: Option<String>,

    /// Annual salary in whole currency units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<u64>,

    /// Salary currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// When the user record was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the account is active
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Whether `manager_id` points at the given user
    pub fn reports_to(&self, manager_id: &str) -> bool {
        self.manager_id.as_deref() == Some(manager_id)
    }

    /// Avatar initials derived from the display name (e.g. "John Doe" -> "JD")
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
