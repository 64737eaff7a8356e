//! Visibility filter — field and entry-level access decisions
//!
//! The single home of the rules deciding what one user may see or edit
//! about another. Rules are evaluated in order, first match wins:
//!
//! 1. Self: full read; write on self-editable fields only. Role,
//!    department and salary stay read-only to self regardless of rank.
//! 2. Direct manager (one hop) holding `view_team`: read all profile
//!    fields and shared entries; full access to `manager-only` entries
//!    on their own reports, except entries authored by a different
//!    manager-level actor.
//! 3. `view_department` and same department: profile fields readable,
//!    `manager-only` entries are not.
//! 4. `view_company`: read everything, for audit.
//! 5. Deny.
//!
//! Write access is always strictly narrower than read. Salary and role
//! are writable only with `manage_users`.
//!
//! Lookup misses stay distinct from denials inside the engine, but the
//! `authorize_*` boundary collapses both into `Forbidden` so callers
//! cannot probe for record existence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::types::{EntryVisibility, Meeting, Role};

use super::role::Capability;
use super::session::Actor;

// ─────────────────────────────────────────────────────────────────
// Profile Fields
// ─────────────────────────────────────────────────────────────────

/// Profile fields subject to per-field decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Location,
    Position,
    ProfessionalNotes,
    Department,
    Role,
    Salary,
    Qis,
    Status,
    StartDate,
}

impl ProfileField {
    /// Get all profile fields
    pub fn all() -> &'static [ProfileField] {
        &[
            ProfileField::Name,
            ProfileField::Email,
            ProfileField::Phone,
            ProfileField::Location,
            ProfileField::Position,
            ProfileField::ProfessionalNotes,
            ProfileField::Department,
            ProfileField::Role,
            ProfileField::Salary,
            ProfileField::Qis,
            ProfileField::Status,
            ProfileField::StartDate,
        ]
    }

    /// Fields a user may edit on their own profile
    pub fn is_self_editable(self) -> bool {
        matches!(
            self,
            ProfileField::Name
                | ProfileField::Email
                | ProfileField::Phone
                | ProfileField::Location
                | ProfileField::ProfessionalNotes
        )
    }

    /// Fields writable only with `manage_users`
    pub fn is_restricted(self) -> bool {
        matches!(self, ProfileField::Role | ProfileField::Salary)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileField::Name => write!(f, "name"),
            ProfileField::Email => write!(f, "email"),
            ProfileField::Phone => write!(f, "phone"),
            ProfileField::Location => write!(f, "location"),
            ProfileField::Position => write!(f, "position"),
            ProfileField::ProfessionalNotes => write!(f, "professional-notes"),
            ProfileField::Department => write!(f, "department"),
            ProfileField::Role => write!(f, "role"),
            ProfileField::Salary => write!(f, "salary"),
            ProfileField::Qis => write!(f, "qis"),
            ProfileField::Status => write!(f, "status"),
            ProfileField::StartDate => write!(f, "start-date"),
        }
    }
}

impl FromStr for ProfileField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(ProfileField::Name),
            "email" => Ok(ProfileField::Email),
            "phone" => Ok(ProfileField::Phone),
            "location" => Ok(ProfileField::Location),
            "position" => Ok(ProfileField::Position),
            "professional-notes" => Ok(ProfileField::ProfessionalNotes),
            "department" => Ok(ProfileField::Department),
            "role" => Ok(ProfileField::Role),
            "salary" => Ok(ProfileField::Salary),
            "qis" => Ok(ProfileField::Qis),
            "status" => Ok(ProfileField::Status),
            "start-date" => Ok(ProfileField::StartDate),
            other => Err(Error::Config(format!("Unknown profile field '{}'", other))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Access Levels
// ─────────────────────────────────────────────────────────────────

/// Outcome of a visibility decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// No access at all
    Denied,
    /// Read-only access
    Read,
    /// Read and write access
    ReadWrite,
}

impl Access {
    /// Whether the record/field may be rendered
    pub fn can_view(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    /// Whether a submitted edit may be accepted
    pub fn can_edit(self) -> bool {
        matches!(self, Access::ReadWrite)
    }
}

/// Which operation an external caller is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    View,
    Edit,
}

// ─────────────────────────────────────────────────────────────────
// Visibility Filter
// ─────────────────────────────────────────────────────────────────

/// Field and entry-level access decisions over a directory
pub struct VisibilityFilter<'a> {
    directory: &'a Directory,
}

impl<'a> VisibilityFilter<'a> {
    /// Create a filter over the given directory
    pub fn new(directory: &'a Directory) -> Self {
        Self { directory }
    }

    // ─────────────────────────────────────────────────────────────
    // Profile Fields
    // ─────────────────────────────────────────────────────────────

    /// Decide access to one profile field of the target user.
    ///
    /// Internal API: lookup misses surface as `NotFound`. External
    /// callers go through [`authorize_profile`](Self::authorize_profile).
    pub fn profile_access(
        &self,
        actor: &Actor,
        target_id: &str,
        field: ProfileField,
    ) -> Result<Access> {
        let target = self.directory.require(target_id)?;

        // Rule 1: own record. Full read; self-editable fields writable,
        // role/department/salary read-only regardless of rank.
        if actor.is(&target.id) {
            let writable =
                field.is_self_editable() && actor.role.has_capability(Capability::EditSelf);
            return Ok(if writable {
                Access::ReadWrite
            } else {
                Access::Read
            });
        }

        let actor_user = self.directory.require(&actor.id)?;

        let read = if target.reports_to(&actor.id)
            && actor.role.has_capability(Capability::ViewTeam)
        {
            // Rule 2: direct manager
            true
        } else if actor.role.has_capability(Capability::ViewDepartment)
            && actor_user.department.eq_ignore_ascii_case(&target.department)
        {
            // Rule 3: department visibility
            true
        } else {
            // Rule 4: company-wide audit
            actor.role.has_capability(Capability::ViewCompany)
        };

        if !read {
            return Ok(Access::Denied);
        }

        // Restricted fields may be written on other users by
        // manage_users holders; nothing else is writable cross-user.
        if field.is_restricted() && actor.role.has_capability(Capability::ManageUsers) {
            return Ok(Access::ReadWrite);
        }

        Ok(Access::Read)
    }

    /// Boundary wrapper for profile decisions: `Ok(())` or `Forbidden`.
    /// Absent and hidden targets are indistinguishable here.
    pub fn authorize_profile(
        &self,
        actor: &Actor,
        target_id: &str,
        field: ProfileField,
        mode: AccessMode,
    ) -> Result<()> {
        let access = self
            .profile_access(actor, target_id, field)
            .map_err(Error::redact_existence)?;
        enforce(access, mode)
    }

    // ─────────────────────────────────────────────────────────────
    // Entries
    // ─────────────────────────────────────────────────────────────

    /// Decide access to one entry of a meeting.
    ///
    /// The meeting's subject is its first attendee; the decision hinges
    /// on the actor's relationship to that subject and on the entry's
    /// visibility tier and author.
    pub fn entry_access(&self, actor: &Actor, meeting: &Meeting, entry_id: &str) -> Result<Access> {
        let entry = meeting
            .entry(entry_id)
            .ok_or_else(|| Error::entry_not_found(entry_id))?;

        let subject = match meeting.subject_id() {
            Some(id) => self.directory.require(id)?,
            // A meeting without attendees has no reporting line to
            // reason about; only company-wide audit access applies.
            None => {
                return Ok(if actor.role.has_capability(Capability::ViewCompany) {
                    Access::Read
                } else {
                    Access::Denied
                });
            }
        };

        let is_author = entry.author_id == actor.id;
        let author_role = self.directory.get(&entry.author_id).map(|u| u.role);

        // Rule 1: the subject sees shared entries; manager-only exists
        // specifically to be hidden from the subject.
        if actor.is(&subject.id) {
            return Ok(match entry.visibility {
                EntryVisibility::Shared => {
                    if is_author && actor.role.has_capability(Capability::EditSelf) {
                        Access::ReadWrite
                    } else {
                        Access::Read
                    }
                }
                EntryVisibility::ManagerOnly => Access::Denied,
            });
        }

        // Rule 2: direct manager of the subject
        if subject.reports_to(&actor.id) && actor.role.has_capability(Capability::ViewTeam) {
            if entry.visibility == EntryVisibility::ManagerOnly {
                // Another manager's private notes stay private.
                let foreign_author = !is_author
                    && author_role.is_some_and(|r| r.at_least(Role::Manager));
                if foreign_author {
                    return Ok(Access::Denied);
                }
            }
            return Ok(if actor.role.has_capability(Capability::EditTeam) {
                Access::ReadWrite
            } else {
                Access::Read
            });
        }

        let actor_user = self.directory.require(&actor.id)?;

        // Rule 3: department visibility never extends to manager-only
        if actor.role.has_capability(Capability::ViewDepartment)
            && actor_user.department.eq_ignore_ascii_case(&subject.department)
            && entry.visibility == EntryVisibility::Shared
        {
            return Ok(Access::Read);
        }

        // Rule 4: company-wide audit reads everything; edits still
        // require authorship or outranking the author.
        if actor.role.has_capability(Capability::ViewCompany) {
            let can_edit = is_author
                || author_role.is_some_and(|r| actor.role.rank() > r.rank());
            return Ok(if can_edit { Access::ReadWrite } else { Access::Read });
        }

        // Rule 5
        Ok(Access::Denied)
    }

    /// Boundary wrapper for entry decisions: `Ok(())` or `Forbidden`.
    pub fn authorize_entry(
        &self,
        actor: &Actor,
        meeting: &Meeting,
        entry_id: &str,
        mode: AccessMode,
    ) -> Result<()> {
        let access = self
            .entry_access(actor, meeting, entry_id)
            .map_err(Error::redact_existence)?;
        enforce(access, mode)
    }

    // ─────────────────────────────────────────────────────────────
    // Goals
    // ─────────────────────────────────────────────────────────────

    /// Decide access to a user's goals. Goals are mutated by the owner
    /// or their direct manager.
    pub fn goal_access(&self, actor: &Actor, owner_id: &str) -> Result<Access> {
        let owner = self.directory.require(owner_id)?;

        if actor.is(&owner.id) {
            return Ok(if actor.role.has_capability(Capability::EditSelf) {
                Access::ReadWrite
            } else {
                Access::Read
            });
        }

        if owner.reports_to(&actor.id) && actor.role.has_capability(Capability::EditTeam) {
            return Ok(Access::ReadWrite);
        }

        let actor_user = self.directory.require(&actor.id)?;
        if actor.role.has_capability(Capability::ViewDepartment)
            && actor_user.department.eq_ignore_ascii_case(&owner.department)
        {
            return Ok(Access::Read);
        }

        if actor.role.has_capability(Capability::ViewCompany) {
            return Ok(Access::Read);
        }

        Ok(Access::Denied)
    }
}

/// Map an access level and requested mode to the boundary result.
/// Denied view access uses the same message as a redacted lookup miss.
fn enforce(access: Access, mode: AccessMode) -> Result<()> {
    if !access.can_view() {
        return Err(Error::forbidden("target is not visible to this actor"));
    }
    if mode == AccessMode::Edit && !access.can_edit() {
        return Err(Error::forbidden("record is read-only for this actor"));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
