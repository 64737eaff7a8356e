//! Meeting and entry definitions
//!
//! A meeting owns its entries (composition: deleting the meeting removes
//! them). Status follows a one-way state machine; entries can only be
//! appended once the meeting has started.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Meeting Status
// ─────────────────────────────────────────────────────────────────

/// Lifecycle of a review meeting.
///
/// `upcoming -> in_progress (optional) -> completed`; completed is
/// terminal. Late entries are still accepted after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    /// Scheduled, not yet started
    Upcoming,
    /// Currently being held
    InProgress,
    /// Held and closed out
    Completed,
}

impl MeetingStatus {
    /// Whether the state machine permits moving to `next`
    pub fn can_transition_to(self, next: MeetingStatus) -> bool {
        matches!(
            (self, next),
            (MeetingStatus::Upcoming, MeetingStatus::InProgress)
                | (MeetingStatus::Upcoming, MeetingStatus::Completed)
                | (MeetingStatus::InProgress, MeetingStatus::Completed)
        )
    }

    /// Whether entries may be appended in this state
    pub fn accepts_entries(self) -> bool {
        matches!(self, MeetingStatus::InProgress | MeetingStatus::Completed)
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingStatus::Upcoming => write!(f, "upcoming"),
            MeetingStatus::InProgress => write!(f, "in_progress"),
            MeetingStatus::Completed => write!(f, "completed"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────────────────────────

/// Kind of performance note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Something that went well
    Achievement,
    /// Something that got in the way
    Challenge,
    /// A forward-looking objective
    Goal,
    /// Manager or peer feedback
    Feedback,
}

impl EntryType {
    /// Get all entry types
    pub fn all() -> &'static [EntryType] {
        &[
            EntryType::Achievement,
            EntryType::Challenge,
            EntryType::Goal,
            EntryType::Feedback,
        ]
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Achievement => write!(f, "achievement"),
            EntryType::Challenge => write!(f, "challenge"),
            EntryType::Goal => write!(f, "goal"),
            EntryType::Feedback => write!(f, "feedback"),
        }
    }
}

/// Visibility tier on an entry.
///
/// `manager-only` exists specifically for the subject's direct manager;
/// the subject employee never sees those entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryVisibility {
    /// Visible to the subject and their reporting line
    Shared,
    /// Visible to the direct manager (and company-wide auditors) only
    ManagerOnly,
}

impl fmt::Display for EntryVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryVisibility::Shared => write!(f, "shared"),
            EntryVisibility::ManagerOnly => write!(f, "manager-only"),
        }
    }
}

/// A single performance note inside a meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque unique identifier
    pub id: String,

    /// Kind of note
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Free-text content
    pub content: String,

    /// Visibility tier
    pub visibility: EntryVisibility,

    /// User id of whoever wrote the entry
    pub author_id: String,
}

// ─────────────────────────────────────────────────────────────────
// Meeting
// ─────────────────────────────────────────────────────────────────

/// One scheduled or completed review session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    /// Opaque unique identifier
    pub id: String,

    /// Display title (e.g. "10-10-10 Meeting - 7/15/2024")
    pub title: String,

    /// Scheduled date
    pub date: NaiveDate,

    /// Attendee user ids, subject employee first
    pub attendees: Vec<String>,

    /// Lifecycle status
    pub status: MeetingStatus,

    /// Ordered performance entries
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Meeting {
    /// The employee the meeting is about. By convention the subject is
    /// listed first in `attendees`.
    pub fn subject_id(&self) -> Option<&str> {
        self.attendees.first().map(String::as_str)
    }

    /// Whether the user is listed as an attendee
    pub fn has_attendee(&self, user_id: &str) -> bool {
        self.attendees.iter().any(|a| a == user_id)
    }

    /// Look up an entry by id
    pub fn entry(&self, entry_id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// Count entries of a given type
    pub fn entry_count(&self, entry_type: EntryType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .count()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
