//! User directory — the read model over all users
//!
//! Thread-safe registry keyed by user id. Structural invariants are
//! enforced on every mutation: a `manager_id` must reference an existing
//! user of manager rank or higher, and the manager graph must stay
//! acyclic. Users are soft-lifecycled; `set_status` toggles, nothing is
//! ever hard-deleted.
//!
//! Aggregation never reads through the lock piecemeal: it takes a
//! `snapshot()` and computes over that immutable copy.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::{Role, User, UserStatus};

// ─────────────────────────────────────────────────────────────────
// Search Filter
// ─────────────────────────────────────────────────────────────────

/// Filters for directory searches (user management and team views)
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring match over name and email
    pub query: Option<String>,

    /// Restrict to one role
    pub role: Option<Role>,

    /// Restrict to one department
    pub department: Option<String>,

    /// Include inactive accounts (excluded by default)
    pub include_inactive: bool,
}

impl UserFilter {
    fn matches(&self, user: &User) -> bool {
        if !self.include_inactive && !user.is_active() {
            return false;
        }
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        if let Some(ref department) = self.department {
            if !user.department.eq_ignore_ascii_case(department) {
                return false;
            }
        }
        if let Some(ref query) = self.query {
            let q = query.to_lowercase();
            if !user.name.to_lowercase().contains(&q) && !user.email.to_lowercase().contains(&q) {
                return false;
            }
        }
        true
    }
}

// ─────────────────────────────────────────────────────────────────
// Directory
// ─────────────────────────────────────────────────────────────────

/// Thread-safe registry of users
#[derive(Debug)]
pub struct Directory {
    users: RwLock<HashMap<String, User>>,
}

impl Directory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Build a directory from a full user list, validating every
    /// manager reference once all records are present.
    pub fn from_users(users: Vec<User>) -> Result<Self> {
        let mut map = HashMap::with_capacity(users.len());
        for user in users {
            if map.contains_key(&user.id) {
                return Err(Error::DuplicateUser { id: user.id });
            }
            map.insert(user.id.clone(), user);
        }

        let directory = Self {
            users: RwLock::new(map),
        };
        directory.validate_graph()?;
        Ok(directory)
    }

    /// Register a new user. The manager reference must already resolve.
    pub fn insert(&self, user: User) -> Result<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.id) {
            return Err(Error::DuplicateUser { id: user.id });
        }
        check_manager_link(&users, &user.id, user.manager_id.as_deref())?;
        users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Get a clone of a user's record
    pub fn get(&self, id: &str) -> Option<User> {
        self.users.read().get(id).cloned()
    }

    /// Get a user or fail with `UserNotFound`
    pub fn require(&self, id: &str) -> Result<User> {
        self.get(id).ok_or_else(|| Error::user_not_found(id))
    }

    /// Point a user at a new manager (re-org). Same invariants as insert.
    pub fn reassign_manager(&self, user_id: &str, manager_id: Option<&str>) -> Result<()> {
        let mut users = self.users.write();
        if !users.contains_key(user_id) {
            return Err(Error::user_not_found(user_id));
        }
        check_manager_link(&users, user_id, manager_id)?;
        let user = users.get_mut(user_id).expect("checked above");
        user.manager_id = manager_id.map(str::to_string);
        Ok(())
    }

    /// Toggle account status (soft lifecycle)
    pub fn set_status(&self, user_id: &str, status: UserStatus) -> Result<()> {
        let mut users = self.users.write();
        match users.get_mut(user_id) {
            Some(user) => {
                user.status = status;
                Ok(())
            }
            None => Err(Error::user_not_found(user_id)),
        }
    }

    /// Update a user's QIS score
    pub fn set_qis(&self, user_id: &str, qis: u8) -> Result<()> {
        let mut users = self.users.write();
        match users.get_mut(user_id) {
            Some(user) => {
                user.qis = qis.min(100);
                Ok(())
            }
            None => Err(Error::user_not_found(user_id)),
        }
    }

    /// Active direct reports of a manager
    pub fn reports_of(&self, manager_id: &str) -> Vec<User> {
        self.collect(|u| u.is_active() && u.reports_to(manager_id))
    }

    /// All direct reports of a manager, including inactive accounts
    pub fn all_reports_of(&self, manager_id: &str) -> Vec<User> {
        self.collect(|u| u.reports_to(manager_id))
    }

    /// Active users in a department
    pub fn in_department(&self, department: &str) -> Vec<User> {
        self.collect(|u| u.is_active() && u.department.eq_ignore_ascii_case(department))
    }

    /// Search with the given filters, sorted by name
    pub fn search(&self, filter: &UserFilter) -> Vec<User> {
        let mut found = self.collect(|u| filter.matches(u));
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// Immutable copy of every user, sorted by id for deterministic
    /// downstream aggregation
    pub fn snapshot(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }

    /// Distinct department names, sorted
    pub fn departments(&self) -> Vec<String> {
        let users = self.users.read();
        let mut departments: Vec<String> = users.values().map(|u| u.department.clone()).collect();
        departments.sort();
        departments.dedup();
        departments
    }

    /// Total user count
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Whether the directory holds no users
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn collect(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        let mut found: Vec<User> = self
            .users
            .read()
            .values()
            .filter(|u| predicate(u))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Validate every manager reference in the current graph
    fn validate_graph(&self) -> Result<()> {
        let users = self.users.read();
        for user in users.values() {
            check_manager_link(&users, &user.id, user.manager_id.as_deref())?;
        }
        Ok(())
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

/// Check one manager link against the map: the manager must exist, hold
/// manager rank or higher, and the chain above must never loop back to
/// `user_id`.
fn check_manager_link(
    users: &HashMap<String, User>,
    user_id: &str,
    manager_id: Option<&str>,
) -> Result<()> {
    let Some(manager_id) = manager_id else {
        return Ok(());
    };

    let manager = users.get(manager_id).ok_or_else(|| Error::UnknownManager {
        user_id: user_id.to_string(),
        manager_id: manager_id.to_string(),
    })?;

    if !manager.role.at_least(Role::Manager) {
        return Err(Error::ManagerRank {
            user_id: user_id.to_string(),
            manager_id: manager_id.to_string(),
            role: manager.role.to_string(),
        });
    }

    // Walk up the chain; a user may never be its own transitive manager.
    // The hop bound guards against loops that do not pass through user_id.
    let mut current = Some(manager_id);
    let mut hops = 0usize;
    while let Some(id) = current {
        if id == user_id {
            return Err(Error::ManagerCycle {
                user_id: user_id.to_string(),
            });
        }
        hops += 1;
        if hops > users.len() {
            return Err(Error::ManagerCycle {
                user_id: user_id.to_string(),
            });
        }
        current = users.get(id).and_then(|u| u.manager_id.as_deref());
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
