//! Threshold-based alert generation
//!
//! Alerts are derived, never persisted: each scan recomputes them from
//! the snapshot. Ids are deterministic functions of the cause, so
//! scanning an unchanged directory twice yields identical ordered
//! output with no duplicate accumulation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::User;

// ─────────────────────────────────────────────────────────────────
// Alert Types
// ─────────────────────────────────────────────────────────────────

/// Alert priority, high first in sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

impl AlertPriority {
    /// Sort key: high sorts before medium before low
    fn order(self) -> u8 {
        match self {
            AlertPriority::High => 0,
            AlertPriority::Medium => 1,
            AlertPriority::Low => 2,
        }
    }
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertPriority::High => write!(f, "high"),
            AlertPriority::Medium => write!(f, "medium"),
            AlertPriority::Low => write!(f, "low"),
        }
    }
}

/// A generated alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Deterministic id derived from the cause
    pub id: String,

    /// Human-readable message
    pub message: String,

    /// Priority tier
    pub priority: AlertPriority,

    /// When the underlying condition was observed
    pub at: DateTime<Utc>,
}

/// An informational system event supplied by the caller, surfaced as a
/// low-priority alert (e.g. "Scheduled maintenance completed")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemEvent {
    pub message: String,
    pub at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────
// Alert Engine
// ─────────────────────────────────────────────────────────────────

/// Scans directory snapshots for alert conditions
pub struct AlertEngine {
    /// QIS below this raises a high-priority alert
    low_qis_threshold: u8,

    /// How far back a user's creation counts as "new"
    new_user_window: Duration,
}

impl AlertEngine {
    /// Create an engine with explicit tunables
    pub fn new(low_qis_threshold: u8, new_user_window_hours: i64) -> Self {
        Self {
            low_qis_threshold,
            new_user_window: Duration::hours(new_user_window_hours),
        }
    }

    /// The configured low-performance threshold
    pub fn threshold(&self) -> u8 {
        self.low_qis_threshold
    }

    /// Scan a snapshot for alerts as of the given instant.
    ///
    /// - high: an active user's QIS is below the threshold
    /// - medium: users were added within the observation window
    /// - low: one per supplied system event
    ///
    /// Output is sorted by priority, then recency descending, then id;
    /// re-running over the same inputs reproduces it exactly.
    pub fn scan(&self, users: &[User], events: &[SystemEvent], as_of: DateTime<Utc>) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for user in users.iter().filter(|u| u.is_active()) {
            if user.qis < self.low_qis_threshold {
                alerts.push(Alert {
                    id: format!("qis-low-{}", user.id),
                    message: format!(
                        "{} ({}) requires attention - QIS dropped to {}",
                        user.name, user.department, user.qis
                    ),
                    priority: AlertPriority::High,
                    at: as_of,
                });
            }
        }

        let window_start = as_of - self.new_user_window;
        let new_users: Vec<&User> = users
            .iter()
            .filter(|u| u.created_at > window_start && u.created_at <= as_of)
            .collect();
        if !new_users.is_empty() {
            let latest = new_users.iter().map(|u| u.created_at).max().unwrap_or(as_of);
            alerts.push(Alert {
                id: "new-users".to_string(),
                message: format!(
                    "{} new employee{} added to the system",
                    new_users.len(),
                    if new_users.len() == 1 { "" } else { "s" }
                ),
                priority: AlertPriority::Medium,
                at: latest,
            });
        }

        for (index, event) in events.iter().enumerate() {
            alerts.push(Alert {
                id: format!("event-{}", index),
                message: event.message.clone(),
                priority: AlertPriority::Low,
                at: event.at,
            });
        }

        alerts.sort_by(|a, b| {
            a.priority
                .order()
                .cmp(&b.priority.order())
                .then_with(|| b.at.cmp(&a.at))
                .then_with(|| a.id.cmp(&b.id))
        });
        alerts
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
