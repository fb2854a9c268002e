//! Typed mutations over a [`Document`].
//!
//! The JSON shape of [`Operation`] is the request body of the file-backed
//! data endpoint: an object tagged by `type` (`habit`, `toggleHabit`,
//! `bulkWorkflowTasks`, ...). Applying an operation never touches more than
//! one collection.

use crate::calendar;
use crate::error::AppError;
use crate::ids::short_id;
use crate::model::{
    DEFAULT_COLOR, DEFAULT_ICON, Document, Extra, Habit, Task, TaskCategory, WorkflowStatus,
    WorkflowTask, strip_reserved,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewHabit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn into_habit(self) -> Result<Habit, AppError> {
        let name = required(&self.name, "name")?;
        Ok(Habit {
            id: short_id(),
            name,
            icon: non_blank(self.icon).unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: non_blank(self.color).unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            completed_dates: Vec::new(),
            streak: Some(serde_json::Value::from(0)),
            extra: strip_reserved(self.extra, Habit::FIELDS),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn into_task(self, today: Date) -> Result<Task, AppError> {
        let title = required(&self.title, "title")?;
        let due_date = calendar::date_or_today(non_blank(self.due_date).as_deref(), today)?;
        Ok(Task {
            id: short_id(),
            title,
            due_date,
            completed: false,
            category: self.category.unwrap_or_default(),
            time: non_blank(self.time).map(serde_json::Value::String),
            extra: strip_reserved(self.extra, Task::FIELDS),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkflowTask {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewWorkflowTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn into_workflow_task(
        self,
        status: WorkflowStatus,
        created_at: String,
    ) -> Result<WorkflowTask, AppError> {
        let title = required(&self.title, "title")?;
        Ok(WorkflowTask {
            id: short_id(),
            title,
            status,
            created_at,
            extra: strip_reserved(self.extra, WorkflowTask::FIELDS),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Habits,
    Tasks,
    WorkflowTasks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Operation {
    Habit {
        habit: NewHabit,
    },
    Task {
        task: NewTask,
    },
    ToggleTask {
        id: String,
    },
    DeleteTask {
        id: String,
    },
    RescheduleTask {
        id: String,
        #[serde(rename = "dueDate")]
        due_date: String,
    },
    ToggleHabit {
        id: String,
        date: String,
    },
    DeleteHabit {
        id: String,
    },
    WorkflowTask {
        task: NewWorkflowTask,
    },
    BulkWorkflowTasks {
        tasks: Vec<NewWorkflowTask>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<WorkflowStatus>,
    },
    MoveWorkflowTask {
        id: String,
        status: WorkflowStatus,
    },
    DeleteWorkflowTask {
        id: String,
    },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Habit { .. } => "habit",
            Self::Task { .. } => "task",
            Self::ToggleTask { .. } => "toggleTask",
            Self::DeleteTask { .. } => "deleteTask",
            Self::RescheduleTask { .. } => "rescheduleTask",
            Self::ToggleHabit { .. } => "toggleHabit",
            Self::DeleteHabit { .. } => "deleteHabit",
            Self::WorkflowTask { .. } => "workflowTask",
            Self::BulkWorkflowTasks { .. } => "bulkWorkflowTasks",
            Self::MoveWorkflowTask { .. } => "moveWorkflowTask",
            Self::DeleteWorkflowTask { .. } => "deleteWorkflowTask",
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Self::Habit { .. } | Self::ToggleHabit { .. } | Self::DeleteHabit { .. } => {
                Collection::Habits
            }
            Self::Task { .. }
            | Self::ToggleTask { .. }
            | Self::DeleteTask { .. }
            | Self::RescheduleTask { .. } => Collection::Tasks,
            Self::WorkflowTask { .. }
            | Self::BulkWorkflowTasks { .. }
            | Self::MoveWorkflowTask { .. }
            | Self::DeleteWorkflowTask { .. } => Collection::WorkflowTasks,
        }
    }
}

impl Document {
    pub fn apply(&mut self, operation: Operation) -> Result<(), AppError> {
        self.apply_at(operation, calendar::now_local())
    }

    /// Applies `operation` as of `now`; the document is unchanged on error.
    pub fn apply_at(&mut self, operation: Operation, now: OffsetDateTime) -> Result<(), AppError> {
        match operation {
            Operation::Habit { habit } => {
                let habit = habit.into_habit()?;
                self.habits.push(habit);
            }
            Operation::Task { task } => {
                let task = task.into_task(now.date())?;
                self.tasks.push(task);
            }
            Operation::ToggleTask { id } => {
                let task = self.task_mut(&id)?;
                task.completed = !task.completed;
            }
            Operation::DeleteTask { id } => {
                let index = position(&self.tasks, &id, |task| &task.id, "task")?;
                self.tasks.remove(index);
            }
            Operation::RescheduleTask { id, due_date } => {
                let due_date = calendar::normalize_date(&due_date)?;
                self.task_mut(&id)?.due_date = due_date;
            }
            Operation::ToggleHabit { id, date } => {
                let date = calendar::normalize_date(&date)?;
                self.habit_mut(&id)?.toggle_date(&date);
            }
            Operation::DeleteHabit { id } => {
                let index = position(&self.habits, &id, |habit| &habit.id, "habit")?;
                self.habits.remove(index);
            }
            Operation::WorkflowTask { task } => {
                let created_at = calendar::timestamp(now)?;
                let status = task.status.unwrap_or_default();
                let task = task.into_workflow_task(status, created_at)?;
                self.workflow_tasks.push(task);
            }
            Operation::BulkWorkflowTasks { tasks, status } => {
                if tasks.is_empty() {
                    return Err(AppError::invalid_input("at least one task is required"));
                }
                let created_at = calendar::timestamp(now)?;
                let status = status.unwrap_or_default();
                let created = tasks
                    .into_iter()
                    .map(|task| task.into_workflow_task(status, created_at.clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                self.workflow_tasks.extend(created);
            }
            Operation::MoveWorkflowTask { id, status } => {
                self.workflow_task_mut(&id)?.status = status;
            }
            Operation::DeleteWorkflowTask { id } => {
                let index = position(&self.workflow_tasks, &id, |task| &task.id, "workflow task")?;
                self.workflow_tasks.remove(index);
            }
        }

        Ok(())
    }

    fn habit_mut(&mut self, id: &str) -> Result<&mut Habit, AppError> {
        let index = position(&self.habits, id, |habit| &habit.id, "habit")?;
        Ok(&mut self.habits[index])
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, AppError> {
        let index = position(&self.tasks, id, |task| &task.id, "task")?;
        Ok(&mut self.tasks[index])
    }

    fn workflow_task_mut(&mut self, id: &str) -> Result<&mut WorkflowTask, AppError> {
        let index = position(&self.workflow_tasks, id, |task| &task.id, "workflow task")?;
        Ok(&mut self.workflow_tasks[index])
    }
}

fn position<T>(
    records: &[T],
    id: &str,
    id_of: impl Fn(&T) -> &String,
    label: &str,
) -> Result<usize, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    records
        .iter()
        .position(|record| id_of(record) == trimmed_id)
        .ok_or_else(|| AppError::not_found(format!("{label} not found: {trimmed_id}")))
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
