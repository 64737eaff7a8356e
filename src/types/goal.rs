//! Goal definitions
//!
//! Goals are owned by a user, independently of meetings. Status is
//! derived from progress, never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Derived goal status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    Completed,
    InProgress,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::InProgress => write!(f, "in-progress"),
        }
    }
}

/// A quarterly objective tracked against progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Opaque unique identifier
    pub id: String,

    /// Owning user id
    pub owner_id: String,

    /// Short description of the objective
    pub title: String,

    /// Completion percentage, 0-100
    pub progress: u8,
}

impl Goal {
    /// Derived status: completed iff progress has reached 100
    pub fn status(&self) -> GoalStatus {
        if self.progress >= 100 {
            GoalStatus::Completed
        } else {
            GoalStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_goal(progress: u8) -> Goal {
        Goal {
            id: "g1".to_string(),
            owner_id: "jd".to_string(),
            title: "Complete Project Alpha".to_string(),
            progress,
        }
    }

    #[test]
    fn test_status_is_derived_from_progress() {
        assert_eq!(make_goal(0).status(), GoalStatus::InProgress);
        assert_eq!(make_goal(90).status(), GoalStatus::InProgress);
        assert_eq!(make_goal(100).status(), GoalStatus::Completed);
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&GoalStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
