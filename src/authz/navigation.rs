//! Navigation authorizer
//!
//! Decides which application sections a role can reach, in render
//! order. Pure function of the role: no hidden state, no randomness,
//! identical output for identical input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Application sections, identified the way routes name them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Dashboard,
    Profile,
    Meetings,
    Team,
    AddEmployee,
    UserManagement,
    Settings,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Dashboard => write!(f, "dashboard"),
            Section::Profile => write!(f, "profile"),
            Section::Meetings => write!(f, "meetings"),
            Section::Team => write!(f, "team"),
            Section::AddEmployee => write!(f, "add-employee"),
            Section::UserManagement => write!(f, "user-management"),
            Section::Settings => write!(f, "settings"),
        }
    }
}

/// Ordered reachable sections for a role.
///
/// Base sections are available to everyone; manager rank appends the
/// team sections, admin rank appends the administration sections. Order
/// drives menu rendering and is stable per role.
pub fn menu_for(role: Role) -> Vec<Section> {
    let mut sections = vec![Section::Dashboard, Section::Profile, Section::Meetings];

    if role.at_least(Role::Manager) {
        sections.push(Section::Team);
        sections.push(Section::AddEmployee);
    }

    if role.at_least(Role::Admin) {
        sections.push(Section::UserManagement);
        sections.push(Section::Settings);
    }

    sections
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
