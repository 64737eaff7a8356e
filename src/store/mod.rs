//! Record stores for meetings and goals
//!
//! Thread-safe owners of the mutable record collections. The meeting
//! store enforces the meeting lifecycle; authorization decisions stay in
//! the authz module and are applied by callers before mutating.

mod goals;
mod meetings;

pub use goals::GoalStore;
pub use meetings::MeetingStore;
