//! Meeting store — owns meetings and their entries
//!
//! Enforces the meeting state machine: `upcoming -> in_progress
//! (optional) -> completed`, with `completed` terminal. Entries may be
//! appended only once a meeting has started; late notes after
//! completion are allowed. Deleting a meeting removes its entries with
//! it (composition).

use std::collections::HashMap;

use chrono::NaiveDate;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Entry, EntryType, EntryVisibility, Meeting, MeetingStatus};

/// Thread-safe registry of meetings
#[derive(Debug)]
pub struct MeetingStore {
    meetings: RwLock<HashMap<String, Meeting>>,
}

impl MeetingStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            meetings: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store from a full meeting list
    pub fn from_meetings(meetings: Vec<Meeting>) -> Result<Self> {
        let mut map = HashMap::with_capacity(meetings.len());
        for meeting in meetings {
            if map.contains_key(&meeting.id) {
                return Err(Error::Internal(format!(
                    "Duplicate meeting id in snapshot: {}",
                    meeting.id
                )));
            }
            map.insert(meeting.id.clone(), meeting);
        }
        Ok(Self {
            meetings: RwLock::new(map),
        })
    }

    /// Schedule a new meeting. Starts life as `upcoming` with no entries.
    pub fn schedule(
        &self,
        title: impl Into<String>,
        date: NaiveDate,
        attendees: Vec<String>,
    ) -> Meeting {
        let meeting = Meeting {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            date,
            attendees,
            status: MeetingStatus::Upcoming,
            entries: Vec::new(),
        };
        self.meetings
            .write()
            .insert(meeting.id.clone(), meeting.clone());
        meeting
    }

    /// Get a clone of a meeting
    pub fn get(&self, id: &str) -> Option<Meeting> {
        self.meetings.read().get(id).cloned()
    }

    /// Get a meeting or fail with `MeetingNotFound`
    pub fn require(&self, id: &str) -> Result<Meeting> {
        self.get(id).ok_or_else(|| Error::meeting_not_found(id))
    }

    /// Move a meeting to a new status, if the state machine allows it
    pub fn transition(&self, id: &str, next: MeetingStatus) -> Result<()> {
        let mut meetings = self.meetings.write();
        let meeting = meetings
            .get_mut(id)
            .ok_or_else(|| Error::meeting_not_found(id))?;

        if !meeting.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: meeting.status.to_string(),
                to: next.to_string(),
            });
        }

        meeting.status = next;
        Ok(())
    }

    /// Mark a meeting as being held
    pub fn start(&self, id: &str) -> Result<()> {
        self.transition(id, MeetingStatus::InProgress)
    }

    /// Close a meeting out. Terminal.
    pub fn complete(&self, id: &str) -> Result<()> {
        self.transition(id, MeetingStatus::Completed)
    }

    /// Append a performance entry. Rejected while the meeting is still
    /// `upcoming`; allowed in progress and (as a late note) after
    /// completion.
    pub fn append_entry(
        &self,
        meeting_id: &str,
        entry_type: EntryType,
        content: impl Into<String>,
        visibility: EntryVisibility,
        author_id: impl Into<String>,
    ) -> Result<Entry> {
        let mut meetings = self.meetings.write();
        let meeting = meetings
            .get_mut(meeting_id)
            .ok_or_else(|| Error::meeting_not_found(meeting_id))?;

        if !meeting.status.accepts_entries() {
            return Err(Error::EntryRejected {
                meeting_id: meeting_id.to_string(),
                reason: format!("meeting is still {}", meeting.status),
            });
        }

        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            entry_type,
            content: content.into(),
            visibility,
            author_id: author_id.into(),
        };
        meeting.entries.push(entry.clone());
        Ok(entry)
    }

    /// Replace an entry's content. Callers check the visibility filter
    /// first; the store only cares that the entry exists.
    pub fn edit_entry(&self, meeting_id: &str, entry_id: &str, content: impl Into<String>) -> Result<()> {
        let mut meetings = self.meetings.write();
        let meeting = meetings
            .get_mut(meeting_id)
            .ok_or_else(|| Error::meeting_not_found(meeting_id))?;

        let entry = meeting
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| Error::entry_not_found(entry_id))?;

        entry.content = content.into();
        Ok(())
    }

    /// Delete a meeting and, with it, all of its entries
    pub fn remove(&self, id: &str) -> Option<Meeting> {
        self.meetings.write().remove(id)
    }

    /// Meetings a user attends, most recent date first
    pub fn for_attendee(&self, user_id: &str) -> Vec<Meeting> {
        let mut found: Vec<Meeting> = self
            .meetings
            .read()
            .values()
            .filter(|m| m.has_attendee(user_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        found
    }

    /// Immutable copy of every meeting, sorted by id
    pub fn snapshot(&self) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self.meetings.read().values().cloned().collect();
        meetings.sort_by(|a, b| a.id.cmp(&b.id));
        meetings
    }

    /// Total meeting count
    pub fn len(&self) -> usize {
        self.meetings.read().len()
    }

    /// Whether the store holds no meetings
    pub fn is_empty(&self) -> bool {
        self.meetings.read().is_empty()
    }
}

impl Default for MeetingStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
