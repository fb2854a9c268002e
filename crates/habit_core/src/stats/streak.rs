use crate::calendar::{format_date, parse_date};
use crate::model::Habit;
use serde::Serialize;
use time::{Date, Duration};

/// Streak information for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStreak {
    pub habit_id: String,
    pub name: String,
    /// Consecutive days ending today, or yesterday when today is still open
    pub current: usize,
    pub longest: usize,
    pub last_completion: Option<String>,
}

impl HabitStreak {
    pub fn calculate(habit: &Habit, today: Date) -> Self {
        let mut dates: Vec<Date> = habit
            .completed_dates
            .iter()
            .filter_map(|value| parse_date(value).ok())
            .collect();
        dates.sort();
        dates.dedup();

        let last_completion = dates.last().and_then(|date| format_date(*date).ok());

        let mut current = run_ending_at(&dates, today);
        if current == 0 {
            current = run_ending_at(&dates, today - Duration::days(1));
        }

        let mut longest = 0;
        let mut streak = 0;
        let mut prev_date: Option<Date> = None;
        for date in &dates {
            streak = match prev_date {
                Some(prev) if (*date - prev).whole_days() == 1 => streak + 1,
                _ => 1,
            };
            longest = longest.max(streak);
            prev_date = Some(*date);
        }

        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            current,
            longest,
            last_completion,
        }
    }

    pub fn for_all(habits: &[Habit], today: Date) -> Vec<Self> {
        habits
            .iter()
            .map(|habit| Self::calculate(habit, today))
            .collect()
    }
}

fn run_ending_at(sorted: &[Date], end: Date) -> usize {
    let mut count = 0;
    let mut check = end;
    while sorted.binary_search(&check).is_ok() {
        count += 1;
        check -= Duration::days(1);
    }
    count
}
