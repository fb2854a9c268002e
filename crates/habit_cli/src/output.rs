//! Plain-text rendering for the `habit` binary.
//!
//! Every function returns the rendered text so the binary decides where it
//! goes. JSON output bypasses this module.

use habit_core::board::Board;
use habit_core::config::Palette;
use habit_core::model::{Habit, Task, WorkflowTask};
use habit_core::stats::{DailyProgress, HabitStreak, UserStats, WeeklyDistribution};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct HabitRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Habit")]
    name: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Today")]
    today: &'static str,
    #[tabled(rename = "Completions")]
    completions: usize,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    title: String,
    #[tabled(rename = "Due")]
    due_date: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Done")]
    done: &'static str,
}

#[derive(Tabled)]
struct StreakRow {
    #[tabled(rename = "Habit")]
    name: String,
    #[tabled(rename = "Current")]
    current: usize,
    #[tabled(rename = "Longest")]
    longest: usize,
    #[tabled(rename = "Last done")]
    last_completion: String,
}

fn check(done: bool) -> &'static str {
    if done { "x" } else { "-" }
}

fn render<R: Tabled>(rows: Vec<R>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

pub fn habits_table(habits: &[Habit], today: &str) -> String {
    if habits.is_empty() {
        return "No habits yet.".to_string();
    }

    render(
        habits
            .iter()
            .map(|habit| HabitRow {
                id: habit.id.clone(),
                name: habit.name.clone(),
                icon: habit.icon.clone(),
                today: check(habit.is_completed_on(today)),
                completions: habit.completion_count(),
            })
            .collect(),
    )
}

pub fn tasks_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }

    render(
        tasks
            .iter()
            .map(|task| TaskRow {
                id: task.id.clone(),
                title: match task.time_label() {
                    Some(time) => format!("{} @ {}", task.title, time),
                    None => task.title.clone(),
                },
                due_date: task.due_date.clone(),
                category: task.category.as_str(),
                done: check(task.completed),
            })
            .collect(),
    )
}

pub fn workflow_line(task: &WorkflowTask) -> String {
    format!("{} | {} | {}", task.id, task.title, task.status.title())
}

pub fn board_view(board: &Board, palette: &Palette) -> String {
    let mut lines = Vec::new();
    for column in &board.columns {
        lines.push(palette.accentize(&format!(
            "{} ({})",
            column.title,
            column.tasks.len()
        )));
        if column.tasks.is_empty() {
            lines.push(palette.mutedize("  (empty)"));
        }
        for task in &column.tasks {
            lines.push(format!("  {} | {}", task.id, task.title));
        }
    }
    lines.join("\n")
}

pub fn stats_view(stats: &UserStats, palette: &Palette) -> String {
    let filled = ((stats.progress_to_next_level / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let bar = format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));

    [
        palette.accentize(&format!("Level {}", stats.level)),
        format!(
            "XP: {} / {} {} {:.0}%",
            stats.xp, stats.next_level_xp, bar, stats.progress_to_next_level
        ),
        format!("Consistency: {}%", stats.consistency),
        palette.mutedize(&format!(
            "Completed: {} tasks, {} habit check-ins",
            stats.total_tasks_completed, stats.total_habits_completed
        )),
    ]
    .join("\n")
}

pub fn analysis_view(
    distribution: &WeeklyDistribution,
    streaks: &[HabitStreak],
    palette: &Palette,
) -> String {
    let mut lines = vec![palette.accentize("Weekly distribution")];
    for day in &distribution.days {
        let width = (distribution.share_of_peak(day.count) / 100.0 * BAR_WIDTH as f64).round()
            as usize;
        lines.push(format!(
            "  {:<9} {:>4} {}",
            day.day,
            day.count,
            "#".repeat(width.min(BAR_WIDTH))
        ));
    }

    lines.push(match distribution.peak_day {
        Some(day) => format!(
            "Most productive day: {} ({})",
            day, distribution.peak_count
        ),
        None => "Most productive day: none yet".to_string(),
    });
    lines.push(format!("Lifetime completions: {}", distribution.lifetime_total));
    if distribution.skipped_dates > 0 {
        lines.push(palette.mutedize(&format!(
            "Skipped {} unreadable dates",
            distribution.skipped_dates
        )));
    }

    if !streaks.is_empty() {
        lines.push(String::new());
        lines.push(palette.accentize("Streaks"));
        lines.push(render(
            streaks
                .iter()
                .map(|streak| StreakRow {
                    name: streak.name.clone(),
                    current: streak.current,
                    longest: streak.longest,
                    last_completion: streak
                        .last_completion
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect(),
        ));
    }

    lines.join("\n")
}

pub fn today_view(progress: &DailyProgress, palette: &Palette) -> String {
    let mut lines = vec![
        palette.accentize(&progress.date),
        format!(
            "Habits: {}/{} ({:.0}%)",
            progress.completed_habits, progress.total_habits, progress.percentage
        ),
    ];
    if progress.tasks.is_empty() {
        lines.push(palette.mutedize("No tasks due."));
    } else {
        lines.push(tasks_table(&progress.tasks));
    }
    lines.join("\n")
}
