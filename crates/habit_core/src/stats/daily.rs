use crate::model::{Document, Task};
use serde::Serialize;

/// What one day looks like on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: String,
    pub completed_habits: usize,
    pub total_habits: usize,
    pub percentage: f64,
    pub tasks: Vec<Task>,
}

impl DailyProgress {
    pub fn calculate(document: &Document, date: &str) -> Self {
        let total_habits = document.habits.len();
        let completed_habits = document
            .habits
            .iter()
            .filter(|habit| habit.is_completed_on(date))
            .count();
        let percentage = if total_habits > 0 {
            completed_habits as f64 / total_habits as f64 * 100.0
        } else {
            0.0
        };

        Self {
            date: date.to_string(),
            completed_habits,
            total_habits,
            percentage,
            tasks: document
                .tasks
                .iter()
                .filter(|task| task.is_due_on(date))
                .cloned()
                .collect(),
        }
    }

    /// Share of the day's habits already done, in `0.0..=1.0`.
    pub fn activity_level(&self) -> f64 {
        self.percentage / 100.0
    }
}
