//! Session context
//!
//! The acting user for one interactive session. The `{id, role}` pair
//! comes from an external, already-authenticated session provider and is
//! trusted as-is; no credential verification happens here.
//!
//! The actor is passed explicitly into every decision so the engine can
//! be exercised with multiple simulated actors in one process. There is
//! no module-level current user.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Role;

/// The authenticated acting user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id, as known to the directory
    pub id: String,

    /// Role tier supplied by the session provider
    pub role: Role,
}

impl Actor {
    /// Create an actor from a trusted `{id, role}` pair
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Create an actor from a trusted id and an unvalidated role string.
    /// Unknown roles fail with `UnknownRole`; they are never defaulted.
    pub fn from_parts(id: impl Into<String>, role: &str) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            role: role.parse::<Role>()?,
        })
    }

    /// Whether this actor is the given user
    pub fn is(&self, user_id: &str) -> bool {
        self.id == user_id
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.role)
    }
}
