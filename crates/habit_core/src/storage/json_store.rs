use crate::error::AppError;
use crate::model::Document;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "data.json";
const STORE_ENV_VAR: &str = "HABIT_STORE_PATH";
pub(crate) const APP_DIR_NAME: &str = "habit-tracker";

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    app_dir().map(|dir| dir.join(STORE_FILE_NAME))
}

pub(crate) fn app_dir() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
    }
}

pub fn load_document(path: &Path) -> Result<Document, AppError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "store file missing, starting empty");
        return Ok(Document::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let document: Document = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    tracing::debug!(
        path = %path.display(),
        habits = document.habits.len(),
        tasks = document.tasks.len(),
        workflow_tasks = document.workflow_tasks.len(),
        "loaded store"
    );
    Ok(document)
}

pub fn save_document(path: &Path, document: &Document) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    tracing::debug!(path = %path.display(), "saved store");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{load_document, save_document};
    use crate::model::{Document, WorkflowStatus};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("habit-{nanos}-{file_name}"))
    }

    fn sample() -> Document {
        serde_json::from_value(serde_json::json!({
            "habits": [
                {"id": "h1", "name": "Read", "icon": "book", "color": "#fff",
                 "completedDates": ["2025-12-19", "2025-12-20"], "streak": 0}
            ],
            "tasks": [
                {"id": "t1", "title": "Call", "dueDate": "2025-12-20", "completed": true, "category": "task"}
            ],
            "workflowTasks": [
                {"id": "w1", "title": "Plan", "status": "IN_PROGRESS", "createdAt": "2025-12-19T10:00:00.000Z"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn missing_file_loads_empty_document() {
        let path = temp_path("missing.json");
        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded, Document::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("data.json");
        let document = sample();

        save_document(&path, &document).unwrap();
        let loaded = load_document(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, document);
        assert_eq!(loaded.workflow_tasks[0].status, WorkflowStatus::InProgress);
    }

    #[test]
    fn accepts_document_without_workflow_tasks() {
        let path = temp_path("no-workflow.json");
        let content = "{\n  \"habits\": [],\n  \"tasks\": [\n    {\n      \"id\": \"t1\",\n      \"title\": \"demo\",\n      \"completed\": false,\n      \"dueDate\": \"2025-12-20\",\n      \"category\": \"routine\"\n    }\n  ]\n}";
        fs::write(&path, content).unwrap();

        let loaded = load_document(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.tasks.len(), 1);
        assert!(loaded.workflow_tasks.is_empty());
    }

    #[test]
    fn preserves_unknown_fields_on_save() {
        let path = temp_path("extra-fields.json");
        let content = serde_json::json!({
            "habits": [{"id": "h1", "name": "Read", "completedDates": [], "mood": "calm"}],
            "tasks": [],
            "workflowTasks": [],
            "owner": "me"
        });
        fs::write(&path, content.to_string()).unwrap();

        let loaded = load_document(&path).unwrap();
        save_document(&path, &loaded).unwrap();
        let stored: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(stored["owner"], "me");
        assert_eq!(stored["habits"][0]["mood"], "calm");
    }

    #[test]
    fn null_time_and_streak_survive_a_save() {
        let path = temp_path("null-fields.json");
        let content = serde_json::json!({
            "habits": [{"id": "h1", "name": "Read", "icon": "book", "color": "#fff",
                        "completedDates": [], "streak": null}],
            "tasks": [{"id": "t1", "title": "Call", "dueDate": "2025-12-20",
                       "completed": false, "category": "routine", "time": null}],
            "workflowTasks": []
        });
        fs::write(&path, content.to_string()).unwrap();

        let loaded = load_document(&path).unwrap();
        save_document(&path, &loaded).unwrap();
        let stored: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(stored, content);
    }

    #[test]
    fn rejects_invalid_json() {
        let path = temp_path("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_document(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let path = temp_path("bad-completed.json");
        let content = "{\n  \"tasks\": [\n    {\n      \"id\": \"t1\",\n      \"title\": \"demo\",\n      \"completed\": \"yes\"\n    }\n  ]\n}";
        fs::write(&path, content).unwrap();

        let err = load_document(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = temp_path("nested");
        let path = dir.join("deeper").join("data.json");

        save_document(&path, &Document::default()).unwrap();
        let exists = path.exists();
        fs::remove_dir_all(&dir).ok();

        assert!(exists);
    }
}
