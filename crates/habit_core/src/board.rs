use crate::error::AppError;
use crate::model::{WorkflowStatus, WorkflowTask};
use crate::operation::{NewWorkflowTask, Operation};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub status: WorkflowStatus,
    pub title: &'static str,
    pub tasks: Vec<WorkflowTask>,
}

/// Workflow tasks grouped into fixed status columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn from_tasks(tasks: &[WorkflowTask]) -> Self {
        let columns = WorkflowStatus::ALL
            .iter()
            .map(|status| Column {
                status: *status,
                title: status.title(),
                tasks: tasks
                    .iter()
                    .filter(|task| task.status == *status)
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, status: WorkflowStatus) -> Option<&Column> {
        self.columns.iter().find(|column| column.status == status)
    }
}

/// One title per non-blank line.
pub fn split_titles(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Single add for one title, bulk add for several.
pub fn add_operation(input: &str, status: WorkflowStatus) -> Result<Operation, AppError> {
    let mut titles = split_titles(input);
    match titles.len() {
        0 => Err(AppError::invalid_input("title is required")),
        1 => Ok(Operation::WorkflowTask {
            task: NewWorkflowTask {
                status: Some(status),
                ..NewWorkflowTask::titled(titles.remove(0))
            },
        }),
        _ => Ok(Operation::BulkWorkflowTasks {
            tasks: titles.into_iter().map(NewWorkflowTask::titled).collect(),
            status: Some(status),
        }),
    }
}
