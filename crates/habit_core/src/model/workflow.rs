use super::Extra;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTask {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl WorkflowTask {
    pub(crate) const FIELDS: &'static [&'static str] = &["id", "title", "status", "createdAt"];
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    #[default]
    NotStarted,
    InProgress,
    Pending,
    Completed,
}

impl WorkflowStatus {
    /// Board column order.
    pub const ALL: [WorkflowStatus; 4] = [
        WorkflowStatus::NotStarted,
        WorkflowStatus::InProgress,
        WorkflowStatus::Pending,
        WorkflowStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

impl std::str::FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let cleaned: String = value
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        match cleaned.as_str() {
            "notstarted" | "todo" => Ok(Self::NotStarted),
            "inprogress" | "doing" => Ok(Self::InProgress),
            "pending" | "blocked" => Ok(Self::Pending),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(format!(
                "unknown status '{}' (expected not-started, in-progress, pending or completed)",
                value.trim()
            )),
        }
    }
}
