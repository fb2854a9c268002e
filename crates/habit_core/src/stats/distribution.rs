use super::engine::{total_habits_completed, total_tasks_completed};
use crate::calendar::{WEEK, parse_date, weekday_name};
use crate::model::{Habit, Task};
use serde::Serialize;
use time::Weekday;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: &'static str,
    pub count: usize,
}

/// Habit completions grouped by day of week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDistribution {
    /// Monday through Sunday.
    pub days: Vec<DayCount>,
    pub peak_day: Option<&'static str>,
    pub peak_count: usize,
    pub lifetime_total: u64,
    pub skipped_dates: usize,
}

impl WeeklyDistribution {
    pub fn calculate(habits: &[Habit], tasks: &[Task]) -> Self {
        // Insertion order decides ties for the peak day.
        let mut seen: Vec<(Weekday, usize)> = Vec::new();
        let mut skipped_dates = 0;

        for habit in habits {
            for value in &habit.completed_dates {
                let weekday = match parse_date(value) {
                    Ok(date) => date.weekday(),
                    Err(_) => {
                        tracing::debug!(habit = %habit.id, date = %value, "skipping unparseable completion date");
                        skipped_dates += 1;
                        continue;
                    }
                };

                match seen.iter_mut().find(|(day, _)| *day == weekday) {
                    Some((_, count)) => *count += 1,
                    None => seen.push((weekday, 1)),
                }
            }
        }

        let count_for = |weekday: Weekday| {
            seen.iter()
                .find(|(day, _)| *day == weekday)
                .map(|(_, count)| *count)
                .unwrap_or(0)
        };
        let days = WEEK
            .iter()
            .map(|weekday| DayCount {
                day: weekday_name(*weekday),
                count: count_for(*weekday),
            })
            .collect();

        let mut ranked = seen.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let (peak_day, peak_count) = ranked
            .first()
            .map(|(day, count)| (Some(weekday_name(*day)), *count))
            .unwrap_or((None, 0));

        Self {
            days,
            peak_day,
            peak_count,
            lifetime_total: total_habits_completed(habits) + total_tasks_completed(tasks),
            skipped_dates,
        }
    }

    /// Bar height for `count` relative to the peak, in percent.
    pub fn share_of_peak(&self, count: usize) -> f64 {
        count as f64 / self.peak_count.max(1) as f64 * 100.0
    }
}
