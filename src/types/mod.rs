//! Type definitions for the Ops Heaven engine
//!
//! This module contains the domain types used throughout the engine:
//! users and roles, meetings and entries, and goals.

mod goal;
mod meeting;
mod user;

pub use goal::*;
pub use meeting::*;
pub use user::*;
