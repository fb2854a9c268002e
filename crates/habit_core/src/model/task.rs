use super::{Extra, present_value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Task {
    pub(crate) const FIELDS: &'static [&'static str] =
        &["id", "title", "dueDate", "completed", "category", "time"];

    /// Time of day when it is stored as text.
    pub fn time_label(&self) -> Option<&str> {
        self.time.as_ref().and_then(serde_json::Value::as_str)
    }

    pub fn is_due_on(&self, date: &str) -> bool {
        self.due_date == date
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    #[default]
    Routine,
    Task,
}

impl TaskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Task => "task",
        }
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "routine" => Ok(Self::Routine),
            "task" => Ok(Self::Task),
            other => Err(format!("unknown category '{other}' (expected routine or task)")),
        }
    }
}
