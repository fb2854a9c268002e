//! Statistics derived from the stored collections.
//!
//! Nothing here is persisted: every value is recomputed from the current
//! habits and tasks.

mod daily;
mod distribution;
mod engine;
mod streak;

pub use daily::DailyProgress;
pub use distribution::{DayCount, WeeklyDistribution};
pub use engine::{
    DEFAULT_CONSISTENCY_TARGET, StatsEngine, UserStats, XP_PER_HABIT, XP_PER_LEVEL, XP_PER_TASK,
    calculate_consistency, calculate_level, calculate_xp, next_level_progress,
    total_habits_completed, total_tasks_completed,
};
pub use streak::HabitStreak;
