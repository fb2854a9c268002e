use super::{Extra, Habit, Task, WorkflowTask, nullable_list};
use serde::{Deserialize, Serialize};

/// The whole persisted state: every collection the store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "nullable_list")]
    pub habits: Vec<Habit>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub workflow_tasks: Vec<WorkflowTask>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Document {
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn workflow_task(&self, id: &str) -> Option<&WorkflowTask> {
        self.workflow_tasks.iter().find(|task| task.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn missing_workflow_tasks_loads_empty() {
        let doc: Document = serde_json::from_str(r#"{"habits":[],"tasks":[]}"#).unwrap();
        assert!(doc.workflow_tasks.is_empty());

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["workflowTasks"], serde_json::json!([]));
    }

    #[test]
    fn empty_object_is_an_empty_document() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn lookups_find_records_by_id() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "habits": [{"id": "h1", "name": "Read", "completedDates": []}],
            "tasks": [{"id": "t1", "title": "Call", "dueDate": "2025-12-20", "completed": false}],
            "workflowTasks": [{"id": "w1", "title": "Plan", "status": "PENDING", "createdAt": ""}]
        }))
        .unwrap();

        assert_eq!(doc.habit("h1").map(|h| h.name.as_str()), Some("Read"));
        assert_eq!(doc.task("t1").map(|t| t.title.as_str()), Some("Call"));
        assert!(doc.workflow_task("w1").is_some());
        assert!(doc.habit("missing").is_none());
    }
}
