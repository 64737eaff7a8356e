//! Error types for the Ops Heaven engine
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//! - Existence redaction for authorization denials

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Role errors (1xx)
    UnknownRole = 100,

    // Lookup errors (2xx) — internal only, redacted at the boundary
    UserNotFound = 200,
    MeetingNotFound = 201,
    EntryNotFound = 202,
    GoalNotFound = 203,

    // Authorization errors (3xx)
    Forbidden = 300,

    // Aggregation errors (4xx)
    NoData = 400,
    InsufficientData = 401,

    // Meeting lifecycle errors (5xx)
    InvalidTransition = 500,
    EntryRejected = 501,

    // Directory errors (6xx)
    UnknownManager = 600,
    ManagerCycle = 601,
    ManagerRank = 602,
    DuplicateUser = 603,

    // Configuration errors (7xx)
    ConfigNotFound = 700,
    ConfigParseError = 701,
    ConfigValidation = 702,

    // IO / snapshot errors (8xx)
    IoRead = 800,
    IoWrite = 801,
    IoPermission = 802,
    IoNotFound = 803,
    SnapshotParse = 810,
    SnapshotSerialize = 811,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Role errors
            200..=299 => 20, // Lookup errors
            300..=399 => 30, // Authorization errors
            400..=499 => 40, // Aggregation errors
            500..=599 => 50, // Meeting lifecycle errors
            600..=699 => 60, // Directory errors
            700..=799 => 70, // Configuration errors
            800..=899 => 80, // IO / snapshot errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the engine
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Role Errors
    // ─────────────────────────────────────────────────────────────

    /// Role string not in the fixed role ladder.
    /// Must never fail open to the lowest tier.
    #[error("Unknown role: {role:?}")]
    UnknownRole { role: String },

    // ─────────────────────────────────────────────────────────────
    // Lookup Errors (internal only)
    // ─────────────────────────────────────────────────────────────

    /// No user with the given id
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    /// No meeting with the given id
    #[error("Meeting not found: {id}")]
    MeetingNotFound { id: String },

    /// No entry with the given id in the meeting
    #[error("Entry not found: {id}")]
    EntryNotFound { id: String },

    /// No goal with the given id
    #[error("Goal not found: {id}")]
    GoalNotFound { id: String },

    // ─────────────────────────────────────────────────────────────
    // Authorization Errors
    // ─────────────────────────────────────────────────────────────

    /// Access denied. Also covers absent targets once redacted,
    /// so callers cannot probe for existence.
    #[error("Not authorized: {message}")]
    Forbidden { message: String },

    // ─────────────────────────────────────────────────────────────
    // Aggregation Errors
    // ─────────────────────────────────────────────────────────────

    /// No meaningful figure can be computed (e.g., zero active reports).
    /// Never coerced to zero.
    #[error("No data: {message}")]
    NoData { message: String },

    /// Series too short for a trend
    #[error("Insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    // ─────────────────────────────────────────────────────────────
    // Meeting Lifecycle Errors
    // ─────────────────────────────────────────────────────────────

    /// Disallowed meeting status transition
    #[error("Invalid meeting transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Entry append rejected by the meeting state machine
    #[error("Entry rejected for meeting {meeting_id}: {reason}")]
    EntryRejected { meeting_id: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Directory Errors
    // ─────────────────────────────────────────────────────────────

    /// manager_id references a user that does not exist
    #[error("User {user_id} references unknown manager {manager_id}")]
    UnknownManager { user_id: String, manager_id: String },

    /// manager_id chain loops back onto the user
    #[error("Manager cycle detected at user {user_id}")]
    ManagerCycle { user_id: String },

    /// manager_id references a user below manager rank
    #[error("User {user_id} has manager {manager_id} with non-manager role {role}")]
    ManagerRank {
        user_id: String,
        manager_id: String,
        role: String,
    },

    /// Duplicate user id on insert
    #[error("User already exists: {id}")]
    DuplicateUser { id: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO / Snapshot Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Snapshot parse error
    #[error("Failed to parse snapshot: {message}")]
    SnapshotParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::UnknownRole { .. } => ErrorCode::UnknownRole,

            Error::UserNotFound { .. } => ErrorCode::UserNotFound,
            Error::MeetingNotFound { .. } => ErrorCode::MeetingNotFound,
            Error::EntryNotFound { .. } => ErrorCode::EntryNotFound,
            Error::GoalNotFound { .. } => ErrorCode::GoalNotFound,

            Error::Forbidden { .. } => ErrorCode::Forbidden,

            Error::NoData { .. } => ErrorCode::NoData,
            Error::InsufficientData { .. } => ErrorCode::InsufficientData,

            Error::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Error::EntryRejected { .. } => ErrorCode::EntryRejected,

            Error::UnknownManager { .. } => ErrorCode::UnknownManager,
            Error::ManagerCycle { .. } => ErrorCode::ManagerCycle,
            Error::ManagerRank { .. } => ErrorCode::ManagerRank,
            Error::DuplicateUser { .. } => ErrorCode::DuplicateUser,

            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::SnapshotParse { .. } => ErrorCode::SnapshotParse,
            Error::Json(_) => ErrorCode::SnapshotSerialize,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the error is an internal lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound { .. }
                | Error::MeetingNotFound { .. }
                | Error::EntryNotFound { .. }
                | Error::GoalNotFound { .. }
        )
    }

    /// Check if the error is fatal (configuration defect, must not fail open)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UnknownRole { .. }
                | Error::ConfigNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::ConfigValidation { .. }
                | Error::Internal(_)
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Collapse lookup misses into `Forbidden` for external callers.
    ///
    /// A denial for a hidden target and a denial for an absent target
    /// must be indistinguishable outside the engine. Internal callers
    /// keep the distinction by not calling this.
    pub fn redact_existence(self) -> Self {
        if self.is_not_found() {
            Error::Forbidden {
                message: "target is not visible to this actor".to_string(),
            }
        } else {
            self
        }
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::UnknownRole { .. } => Some(
                "Roles must be one of: employee, manager, admin, super-admin. Check the session data or snapshot file."
            ),
            Error::Forbidden { .. } => Some(
                "The acting user does not have access to this record. Check the actor's role and reporting line."
            ),
            Error::NoData { .. } => Some(
                "There are no active users behind this figure. This is an explicit no-data state, not a zero."
            ),
            Error::InsufficientData { .. } => Some(
                "Trend deltas need at least two historical points."
            ),
            Error::EntryRejected { .. } => Some(
                "Entries can only be added once a meeting has started or completed."
            ),
            Error::UnknownManager { .. } | Error::ManagerRank { .. } | Error::ManagerCycle { .. } => Some(
                "Fix the manager references in the snapshot file. Every manager_id must point to an existing manager-ranked user, with no cycles."
            ),
            Error::ConfigNotFound { .. } => Some(
                "Run 'ops-heaven config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'ops-heaven config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values. See documentation for valid options."
            ),
            Error::SnapshotParse { .. } => Some(
                "The snapshot file is not valid JSON for this engine. Check the file passed via --data or the configured snapshot path."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", code.as_str(), self);

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create an unknown-role error
    pub fn unknown_role(role: impl Into<String>) -> Self {
        Error::UnknownRole { role: role.into() }
    }

    /// Create a user-not-found error
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Error::UserNotFound { id: id.into() }
    }

    /// Create a meeting-not-found error
    pub fn meeting_not_found(id: impl Into<String>) -> Self {
        Error::MeetingNotFound { id: id.into() }
    }

    /// Create an entry-not-found error
    pub fn entry_not_found(id: impl Into<String>) -> Self {
        Error::EntryNotFound { id: id.into() }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Error::Forbidden {
            message: message.into(),
        }
    }

    /// Create a no-data error
    pub fn no_data(message: impl Into<String>) -> Self {
        Error::NoData {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a config parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a snapshot parse error
    pub fn snapshot_parse(message: impl Into<String>) -> Self {
        Error::SnapshotParse {
            message: message.into(),
            source: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
