//! Snapshot file handling
//!
//! The engine does not own persistence; it consumes a JSON snapshot of
//! the external directory/store collaborator. Loading validates every
//! structural invariant before any decision runs against the data.

use std::fs;
use std::path::Path;

use chrono::TimeZone;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::SystemEvent;
use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::store::{GoalStore, MeetingStore};
use crate::types::{
    Entry, EntryType, EntryVisibility, Goal, Meeting, MeetingStatus, Role, User, UserStatus,
};

// ─────────────────────────────────────────────────────────────────
// Snapshot Document
// ─────────────────────────────────────────────────────────────────

/// On-disk shape of the directory/store snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// All user records
    pub users: Vec<User>,

    /// All meetings with their entries
    #[serde(default)]
    pub meetings: Vec<Meeting>,

    /// All goals
    #[serde(default)]
    pub goals: Vec<Goal>,

    /// Informational system events for the alert scan
    #[serde(default)]
    pub events: Vec<SystemEvent>,
}

/// Hydrated stores ready for engine queries
#[derive(Debug)]
pub struct DataSet {
    pub directory: Directory,
    pub meetings: MeetingStore,
    pub goals: GoalStore,
    pub events: Vec<SystemEvent>,
}

impl Snapshot {
    /// Read and parse a snapshot file
    pub fn load(path: &Path) -> Result<Snapshot> {
        let raw = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|e| Error::SnapshotParse {
            message: format!("{}: {}", path.display(), e),
            source: Some(e),
        })?;

        debug!(
            path = %path.display(),
            users = snapshot.users.len(),
            meetings = snapshot.meetings.len(),
            goals = snapshot.goals.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Serialize the snapshot to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|e| Error::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate invariants and build the in-memory stores
    pub fn hydrate(self) -> Result<DataSet> {
        Ok(DataSet {
            directory: Directory::from_users(self.users)?,
            meetings: MeetingStore::from_meetings(self.meetings)?,
            goals: GoalStore::from_goals(self.goals)?,
            events: self.events,
        })
    }

    /// Load and hydrate in one step
    pub fn open(path: &Path) -> Result<DataSet> {
        Self::load(path)?.hydrate()
    }
}

// ─────────────────────────────────────────────────────────────────
// Sample Data
// ─────────────────────────────────────────────────────────────────

/// A small, self-consistent sample snapshot for `data init` and demos
pub fn sample() -> Snapshot {
    let hired = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap();

    let user = |id: &str,
                name: &str,
                role: Role,
                department: &str,
                position: &str,
                manager_id: Option<&str>,
                qis: u8,
                status: UserStatus,
                created: chrono::DateTime<Utc>| User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!(
            "{}@company.com",
            name.to_lowercase().replace(' ', ".")
        ),
        role,
        department: department.to_string(),
        position: position.to_string(),
        manager_id: manager_id.map(str::to_string),
        qis,
        status,
        phone: Some("+1 (555) 123-4567".to_string()),
        location: Some("San Francisco, CA".to_string()),
        professional_notes: None,
        salary: Some(75_000),
        currency: Some("USD".to_string()),
        created_at: created,
    };

    let users = vec![
        user(
            "sj",
            "Sarah Johnson",
            Role::Manager,
            "Engineering",
            "Engineering Manager",
            None,
            92,
            UserStatus::Active,
            hired(2021, 3, 1),
        ),
        user(
            "jd",
            "John Doe",
            Role::Employee,
            "Engineering",
            "Software Engineer",
            Some("sj"),
            88,
            UserStatus::Active,
            hired(2023, 1, 15),
        ),
        user(
            "aj",
            "Alice Johnson",
            Role::Employee,
            "Engineering",
            "Frontend Developer",
            Some("sj"),
            85,
            UserStatus::Active,
            hired(2023, 5, 2),
        ),
        user(
            "bs",
            "Bob Smith",
            Role::Employee,
            "Engineering",
            "Backend Developer",
            Some("sj"),
            72,
            UserStatus::Active,
            hired(2022, 8, 20),
        ),
        user(
            "cw",
            "Carol Williams",
            Role::Employee,
            "Design",
            "UI/UX Designer",
            None,
            91,
            UserStatus::Active,
            hired(2022, 2, 14),
        ),
        user(
            "mw",
            "Mike Wilson",
            Role::SuperAdmin,
            "IT",
            "System Administrator",
            None,
            95,
            UserStatus::Active,
            hired(2020, 6, 1),
        ),
    ];

    let entry = |id: &str, entry_type, content: &str, visibility, author: &str| Entry {
        id: id.to_string(),
        entry_type,
        content: content.to_string(),
        visibility,
        author_id: author.to_string(),
    };

    let meetings = vec![
        Meeting {
            id: "m1".to_string(),
            title: "10-10-10 Meeting - 7/15/2024".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            attendees: vec!["jd".to_string(), "sj".to_string()],
            status: MeetingStatus::Completed,
            entries: vec![
                entry(
                    "e1",
                    EntryType::Achievement,
                    "Successfully launched the new user dashboard with 15% improvement in user engagement",
                    EntryVisibility::Shared,
                    "jd",
                ),
                entry(
                    "e2",
                    EntryType::Achievement,
                    "Mentored two junior developers, helping them complete their onboarding projects",
                    EntryVisibility::Shared,
                    "jd",
                ),
                entry(
                    "e3",
                    EntryType::Challenge,
                    "Faced some performance issues with the database queries that took longer to resolve than expected",
                    EntryVisibility::Shared,
                    "jd",
                ),
                entry(
                    "e4",
                    EntryType::Goal,
                    "Complete advanced React patterns course by end of Q3",
                    EntryVisibility::Shared,
                    "jd",
                ),
                entry(
                    "e5",
                    EntryType::Goal,
                    "Lead the migration of legacy components to TypeScript",
                    EntryVisibility::Shared,
                    "jd",
                ),
                entry(
                    "e6",
                    EntryType::Feedback,
                    "Manager noted excellent communication during cross-team collaboration",
                    EntryVisibility::ManagerOnly,
                    "sj",
                ),
            ],
        },
        Meeting {
            id: "m2".to_string(),
            title: "10-10-10 Meeting - 10/15/2024".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
            attendees: vec!["jd".to_string(), "sj".to_string()],
            status: MeetingStatus::Upcoming,
            entries: vec![],
        },
    ];

    let goal = |id: &str, title: &str, progress| Goal {
        id: id.to_string(),
        owner_id: "jd".to_string(),
        title: title.to_string(),
        progress,
    };

    let goals = vec![
        goal("g1", "Complete Project Alpha", 90),
        goal("g2", "Learn React Advanced Patterns", 75),
        goal("g3", "Mentor Junior Developer", 100),
        goal("g4", "Attend 2 Tech Conferences", 50),
    ];

    let events = vec![SystemEvent {
        message: "Scheduled maintenance completed successfully".to_string(),
        at: hired(2024, 10, 14),
    }];

    Snapshot {
        users,
        meetings,
        goals,
        events,
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
