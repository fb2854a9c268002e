use super::{Extra, nullable_list, present_value};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ICON: &str = "target";
pub const DEFAULT_COLOR: &str = "#8b5cf6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, deserialize_with = "nullable_list")]
    pub completed_dates: Vec<String>,
    /// Stored as written; streaks are computed from `completed_dates`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub streak: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Habit {
    pub(crate) const FIELDS: &'static [&'static str] =
        &["id", "name", "icon", "color", "completedDates", "streak"];

    pub fn completion_count(&self) -> usize {
        self.completed_dates.len()
    }

    pub fn is_completed_on(&self, date: &str) -> bool {
        self.completed_dates.iter().any(|value| value == date)
    }

    /// Flips membership of `date`; returns whether the habit is now completed that day.
    pub fn toggle_date(&mut self, date: &str) -> bool {
        if self.is_completed_on(date) {
            self.completed_dates.retain(|value| value != date);
            false
        } else {
            self.completed_dates.push(date.to_string());
            true
        }
    }
}
