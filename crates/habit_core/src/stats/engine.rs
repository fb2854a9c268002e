//! Experience, level and consistency derived from habits and tasks.

use crate::model::{Habit, Task};
use crate::state::{Change, ChangeFeed};
use serde::Serialize;

pub const XP_PER_TASK: u64 = 10;
pub const XP_PER_HABIT: u64 = 5;
pub const XP_PER_LEVEL: u64 = 1000;
/// Completions per habit that count as full consistency.
pub const DEFAULT_CONSISTENCY_TARGET: u64 = 5;

pub fn total_tasks_completed(tasks: &[Task]) -> u64 {
    tasks.iter().filter(|task| task.completed).count() as u64
}

pub fn total_habits_completed(habits: &[Habit]) -> u64 {
    habits
        .iter()
        .map(|habit| habit.completion_count() as u64)
        .sum()
}

pub fn calculate_xp(tasks: &[Task], habits: &[Habit]) -> u64 {
    total_tasks_completed(tasks) * XP_PER_TASK + total_habits_completed(habits) * XP_PER_HABIT
}

pub fn calculate_level(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// Percentage of the way through the current level.
pub fn next_level_progress(xp: u64) -> f64 {
    (xp % XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64 * 100.0
}

/// Rounded half-up and clamped to 100; zero without habits.
pub fn calculate_consistency(habits: &[Habit], target_per_habit: u64) -> u64 {
    let completions = total_habits_completed(habits);
    if habits.is_empty() || completions == 0 {
        return 0;
    }

    let expected = habits.len() as u64 * target_per_habit.max(1);
    let rounded = (200 * completions + expected) / (2 * expected);
    rounded.min(100)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub level: u64,
    pub xp: u64,
    pub next_level_xp: u64,
    pub progress_to_next_level: f64,
    pub consistency: u64,
    pub total_tasks_completed: u64,
    pub total_habits_completed: u64,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            next_level_xp: XP_PER_LEVEL,
            progress_to_next_level: 0.0,
            consistency: 0,
            total_tasks_completed: 0,
            total_habits_completed: 0,
        }
    }
}

impl UserStats {
    pub fn calculate(habits: &[Habit], tasks: &[Task]) -> Self {
        Self::calculate_with_target(habits, tasks, DEFAULT_CONSISTENCY_TARGET)
    }

    pub fn calculate_with_target(habits: &[Habit], tasks: &[Task], target_per_habit: u64) -> Self {
        let xp = calculate_xp(tasks, habits);
        let level = calculate_level(xp);
        Self {
            level,
            xp,
            next_level_xp: level * XP_PER_LEVEL,
            progress_to_next_level: next_level_progress(xp),
            consistency: calculate_consistency(habits, target_per_habit),
            total_tasks_completed: total_tasks_completed(tasks),
            total_habits_completed: total_habits_completed(habits),
        }
    }
}

/// Keeps [`UserStats`] current for the latest habit and task snapshots.
#[derive(Debug, Clone)]
pub struct StatsEngine {
    habits: Vec<Habit>,
    tasks: Vec<Task>,
    target_per_habit: u64,
    stats: UserStats,
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CONSISTENCY_TARGET)
    }
}

impl StatsEngine {
    pub fn new(target_per_habit: u64) -> Self {
        Self {
            habits: Vec::new(),
            tasks: Vec::new(),
            target_per_habit,
            stats: UserStats::default(),
        }
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Takes one snapshot; returns whether the stats were recomputed.
    pub fn observe(&mut self, change: &Change) -> bool {
        match change {
            Change::Habits(habits) => self.habits = habits.clone(),
            Change::Tasks(tasks) => self.tasks = tasks.clone(),
            Change::WorkflowTasks(_) => return false,
        }

        self.stats = UserStats::calculate_with_target(&self.habits, &self.tasks, self.target_per_habit);
        true
    }

    /// Drains every pending change from `feed`; returns how many recomputed the stats.
    pub fn sync(&mut self, feed: &ChangeFeed) -> usize {
        feed.pending()
            .filter(|change| self.observe(change))
            .count()
    }
}
