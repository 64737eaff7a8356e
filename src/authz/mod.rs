//! Authorization engine
//!
//! One place for every access decision: role capabilities and ranks,
//! navigation reachability, and field/entry-level visibility. UI layers
//! consume decisions from here and never re-implement the rules.

mod navigation;
mod role;
mod session;
mod visibility;

pub use navigation::{menu_for, Section};
pub use role::Capability;
pub use session::Actor;
pub use visibility::{Access, AccessMode, ProfileField, VisibilityFilter};
