//! taskdeck-core: task model and the deadline-aware prioritization engine

pub mod error;
pub mod prioritizer;
pub mod task;
pub mod time;

pub use error::InvalidInput;
pub use prioritizer::{
    CapacityAssessment, DailyPlan, Prioritized, DEFAULT_DAILY_LIMIT, estimate_capacity,
    prioritize, score_task, suggest_daily,
};
pub use task::{Priority, ScoredTask, TaskView};
pub use time::{IsoStamp, days_until, is_overdue, parse_stamp};
