//! Goal store — per-user objectives
//!
//! Goals live independently of meetings. Progress is clamped to 0-100;
//! status is always derived from progress by the `Goal` type itself.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::Goal;

/// Thread-safe registry of goals
#[derive(Debug)]
pub struct GoalStore {
    goals: RwLock<HashMap<String, Goal>>,
}

impl GoalStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            goals: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store from a full goal list
    pub fn from_goals(goals: Vec<Goal>) -> Result<Self> {
        let mut map = HashMap::with_capacity(goals.len());
        for goal in goals {
            if map.contains_key(&goal.id) {
                return Err(Error::Internal(format!(
                    "Duplicate goal id in snapshot: {}",
                    goal.id
                )));
            }
            map.insert(goal.id.clone(), goal);
        }
        Ok(Self {
            goals: RwLock::new(map),
        })
    }

    /// Create a new goal for a user
    pub fn add(&self, owner_id: impl Into<String>, title: impl Into<String>, progress: u8) -> Goal {
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            progress: progress.min(100),
        };
        self.goals.write().insert(goal.id.clone(), goal.clone());
        goal
    }

    /// Get a clone of a goal
    pub fn get(&self, id: &str) -> Option<Goal> {
        self.goals.read().get(id).cloned()
    }

    /// Update progress, clamped to 100
    pub fn set_progress(&self, goal_id: &str, progress: u8) -> Result<()> {
        let mut goals = self.goals.write();
        match goals.get_mut(goal_id) {
            Some(goal) => {
                goal.progress = progress.min(100);
                Ok(())
            }
            None => Err(Error::GoalNotFound {
                id: goal_id.to_string(),
            }),
        }
    }

    /// All goals owned by a user, sorted by id
    pub fn for_owner(&self, owner_id: &str) -> Vec<Goal> {
        let mut found: Vec<Goal> = self
            .goals
            .read()
            .values()
            .filter(|g| g.owner_id == owner_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Immutable copy of every goal, sorted by id
    pub fn snapshot(&self) -> Vec<Goal> {
        let mut goals: Vec<Goal> = self.goals.read().values().cloned().collect();
        goals.sort_by(|a, b| a.id.cmp(&b.id));
        goals
    }

    /// Total goal count
    pub fn len(&self) -> usize {
        self.goals.read().len()
    }

    /// Whether the store holds no goals
    pub fn is_empty(&self) -> bool {
        self.goals.read().is_empty()
    }
}

impl Default for GoalStore {
    fn default() -> Self {
        Self::new()
    }
}
