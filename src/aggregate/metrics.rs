//! Score rollups and dashboard figures
//!
//! Every function takes a snapshot slice; nothing reads through locks
//! while computing. A figure over zero active users is `NoData`, never
//! a misleading 0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Goal, GoalStatus, Role, User};

// ─────────────────────────────────────────────────────────────────
// Averages
// ─────────────────────────────────────────────────────────────────

/// Mean QIS over a manager's active direct reports.
/// `NoData` when the manager has zero active reports.
pub fn team_average(users: &[User], manager_id: &str) -> Result<f64> {
    mean(users
        .iter()
        .filter(|u| u.is_active() && u.reports_to(manager_id)))
    .ok_or_else(|| Error::no_data(format!("manager {} has no active reports", manager_id)))
}

/// Mean QIS over a department's active users.
/// `NoData` when the department has zero active users.
pub fn department_average(users: &[User], department: &str) -> Result<f64> {
    mean(users
        .iter()
        .filter(|u| u.is_active() && u.department.eq_ignore_ascii_case(department)))
    .ok_or_else(|| Error::no_data(format!("department {} has no active users", department)))
}

/// Mean QIS over all active users.
pub fn company_average(users: &[User]) -> Result<f64> {
    mean(users.iter().filter(|u| u.is_active()))
        .ok_or_else(|| Error::no_data("no active users in the directory"))
}

fn mean<'a>(users: impl Iterator<Item = &'a User>) -> Option<f64> {
    let mut sum = 0u64;
    let mut count = 0u64;
    for user in users {
        sum += u64::from(user.qis);
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

// ─────────────────────────────────────────────────────────────────
// Trends
// ─────────────────────────────────────────────────────────────────

/// Delta between the most recent and the prior point of a historical
/// series. `InsufficientData` below two points.
pub fn trend(series: &[f64]) -> Result<f64> {
    if series.len() < 2 {
        return Err(Error::InsufficientData {
            needed: 2,
            got: series.len(),
        });
    }
    Ok(series[series.len() - 1] - series[series.len() - 2])
}

// ─────────────────────────────────────────────────────────────────
// Performance Bands
// ─────────────────────────────────────────────────────────────────

/// Classification of a QIS value used by team listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    /// 90 and above
    Excellent,
    /// 80 to 89
    Good,
    /// 70 to 79
    Average,
    /// Below 70
    Poor,
}

impl PerformanceBand {
    /// Band for a QIS value
    pub fn for_score(qis: u8) -> Self {
        if qis >= 90 {
            PerformanceBand::Excellent
        } else if qis >= 80 {
            PerformanceBand::Good
        } else if qis >= 70 {
            PerformanceBand::Average
        } else {
            PerformanceBand::Poor
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceBand::Excellent => write!(f, "excellent"),
            PerformanceBand::Good => write!(f, "good"),
            PerformanceBand::Average => write!(f, "average"),
            PerformanceBand::Poor => write!(f, "poor"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Rankings and Summaries
// ─────────────────────────────────────────────────────────────────

/// A manager's active reports ordered by QIS descending (ties broken
/// by name for stable output)
pub fn team_ranking(users: &[User], manager_id: &str) -> Vec<User> {
    let mut team: Vec<User> = users
        .iter()
        .filter(|u| u.is_active() && u.reports_to(manager_id))
        .cloned()
        .collect();
    team.sort_by(|a, b| b.qis.cmp(&a.qis).then_with(|| a.name.cmp(&b.name)));
    team
}

/// Per-department head count and average
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentStats {
    /// Department name
    pub name: String,

    /// Active users in the department
    pub headcount: usize,

    /// Mean QIS over those users
    pub average: f64,

    /// Delta against a prior reading, when one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

/// Statistics for every department with at least one active user,
/// sorted by name. `prior` readings (e.g. last quarter's stats) yield
/// the change column; departments without a prior reading report none.
pub fn department_stats(users: &[User], prior: &[DepartmentStats]) -> Vec<DepartmentStats> {
    let mut names: Vec<&str> = users
        .iter()
        .filter(|u| u.is_active())
        .map(|u| u.department.as_str())
        .collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .map(|name| {
            let members: Vec<&User> = users
                .iter()
                .filter(|u| u.is_active() && u.department == name)
                .collect();
            let average = members.iter().map(|u| f64::from(u.qis)).sum::<f64>()
                / members.len() as f64;
            let change = prior
                .iter()
                .find(|p| p.name == name)
                .map(|p| average - p.average);
            DepartmentStats {
                name: name.to_string(),
                headcount: members.len(),
                average,
                change,
            }
        })
        .collect()
}

/// Company-wide dashboard summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    /// Total user records, active or not
    pub total_users: usize,

    /// Active user records
    pub active_users: usize,

    /// Mean QIS over active users; absent when there are none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_qis: Option<f64>,

    /// Users holding manager rank or higher
    pub manager_count: usize,
}

/// Compute the company summary over a snapshot
pub fn company_summary(users: &[User]) -> CompanySummary {
    CompanySummary {
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.is_active()).count(),
        average_qis: company_average(users).ok(),
        manager_count: users
            .iter()
            .filter(|u| u.role.at_least(Role::Manager))
            .count(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Goals
// ─────────────────────────────────────────────────────────────────

/// Completed/total goal summary for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalCompletion {
    pub completed: usize,
    pub total: usize,
    /// Completion rate in percent
    pub rate: f64,
}

/// Summarize a user's goals. `NoData` when there are none; a user with
/// no goals has no completion rate, not a rate of zero.
pub fn goal_completion(goals: &[Goal]) -> Result<GoalCompletion> {
    if goals.is_empty() {
        return Err(Error::no_data("user has no goals"));
    }
    let completed = goals
        .iter()
        .filter(|g| g.status() == GoalStatus::Completed)
        .count();
    Ok(GoalCompletion {
        completed,
        total: goals.len(),
        rate: completed as f64 / goals.len() as f64 * 100.0,
    })
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
