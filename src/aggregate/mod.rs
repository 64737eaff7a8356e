//! Aggregation engine
//!
//! Dashboard rollups computed over immutable snapshots of the directory
//! and stores: team and department averages, trend deltas, performance
//! bands, company summaries, and threshold-based alerts. Everything here
//! is a pure function of its inputs; an empty population is an explicit
//! no-data state, never a zero.

mod alerts;
mod metrics;

pub use alerts::{Alert, AlertEngine, AlertPriority, SystemEvent};
pub use metrics::{
    company_summary, department_average, department_stats, goal_completion, team_average,
    team_ranking, trend, CompanySummary, DepartmentStats, GoalCompletion, PerformanceBand,
};
