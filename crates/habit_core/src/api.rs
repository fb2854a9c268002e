use crate::board::{self, Board};
use crate::calendar;
use crate::error::AppError;
use crate::model::{Document, Habit, Task, TaskCategory, WorkflowStatus, WorkflowTask};
use crate::operation::{NewHabit, NewTask, Operation};
use crate::state::{HabitState, JsonFile};
use crate::stats::{DailyProgress, HabitStreak, UserStats, WeeklyDistribution};
use crate::storage::json_store;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct HabitToggle {
    pub habit: Habit,
    pub date: String,
    pub completed: bool,
}

fn open(path: &Path) -> Result<HabitState<JsonFile>, AppError> {
    HabitState::open(JsonFile::new(path))
}

pub fn load_document() -> Result<Document, AppError> {
    let path = json_store::store_path()?;
    json_store::load_document(&path)
}

pub fn apply_operation(operation: Operation) -> Result<Document, AppError> {
    let path = json_store::store_path()?;
    apply_operation_with_path(&path, operation)
}

pub fn add_habit(name: &str, icon: Option<&str>, color: Option<&str>) -> Result<Habit, AppError> {
    let path = json_store::store_path()?;
    add_habit_with_path(&path, name, icon, color)
}

pub fn toggle_habit(id: &str, date: Option<&str>) -> Result<HabitToggle, AppError> {
    let path = json_store::store_path()?;
    toggle_habit_with_path(&path, id, date)
}

pub fn delete_habit(id: &str) -> Result<Habit, AppError> {
    let path = json_store::store_path()?;
    delete_habit_with_path(&path, id)
}

pub fn list_habits() -> Result<Vec<Habit>, AppError> {
    Ok(load_document()?.habits)
}

pub fn add_task(
    title: &str,
    due_date: Option<&str>,
    category: TaskCategory,
) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, title, due_date, category)
}

pub fn toggle_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    toggle_task_with_path(&path, id)
}

pub fn delete_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    delete_task_with_path(&path, id)
}

pub fn reschedule_task(id: &str, due_date: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    reschedule_task_with_path(&path, id, due_date)
}

pub fn tasks_due_on(date: Option<&str>) -> Result<Vec<Task>, AppError> {
    let path = json_store::store_path()?;
    tasks_due_on_with_path(&path, date)
}

pub fn add_workflow_tasks(input: &str, status: WorkflowStatus) -> Result<Vec<WorkflowTask>, AppError> {
    let path = json_store::store_path()?;
    add_workflow_tasks_with_path(&path, input, status)
}

pub fn move_workflow_task(id: &str, status: WorkflowStatus) -> Result<WorkflowTask, AppError> {
    let path = json_store::store_path()?;
    move_workflow_task_with_path(&path, id, status)
}

pub fn delete_workflow_task(id: &str) -> Result<WorkflowTask, AppError> {
    let path = json_store::store_path()?;
    delete_workflow_task_with_path(&path, id)
}

pub fn board() -> Result<Board, AppError> {
    Ok(Board::from_tasks(&load_document()?.workflow_tasks))
}

pub fn user_stats(consistency_target: u64) -> Result<UserStats, AppError> {
    let document = load_document()?;
    Ok(UserStats::calculate_with_target(
        &document.habits,
        &document.tasks,
        consistency_target,
    ))
}

pub fn weekly_distribution() -> Result<WeeklyDistribution, AppError> {
    let document = load_document()?;
    Ok(WeeklyDistribution::calculate(&document.habits, &document.tasks))
}

pub fn habit_streaks() -> Result<Vec<HabitStreak>, AppError> {
    Ok(HabitStreak::for_all(&load_document()?.habits, calendar::today()))
}

pub fn daily_progress(date: Option<&str>) -> Result<DailyProgress, AppError> {
    let path = json_store::store_path()?;
    daily_progress_with_path(&path, date)
}

fn apply_operation_with_path(path: &Path, operation: Operation) -> Result<Document, AppError> {
    let mut state = open(path)?;
    Ok(state.apply(operation)?.clone())
}

fn add_habit_with_path(
    path: &Path,
    name: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<Habit, AppError> {
    let habit = NewHabit {
        icon: icon.map(str::to_string),
        color: color.map(str::to_string),
        ..NewHabit::named(name)
    };

    let mut state = open(path)?;
    let document = state.apply(Operation::Habit { habit })?;
    document
        .habits
        .last()
        .cloned()
        .ok_or_else(|| AppError::invalid_data("habit was not stored"))
}

fn toggle_habit_with_path(
    path: &Path,
    id: &str,
    date: Option<&str>,
) -> Result<HabitToggle, AppError> {
    let date = calendar::date_or_today(date, calendar::today())?;
    let trimmed_id = id.trim().to_string();

    let mut state = open(path)?;
    let document = state.apply(Operation::ToggleHabit {
        id: trimmed_id.clone(),
        date: date.clone(),
    })?;
    let habit = document
        .habit(&trimmed_id)
        .cloned()
        .ok_or_else(|| AppError::not_found("habit not found"))?;
    let completed = habit.is_completed_on(&date);

    Ok(HabitToggle {
        habit,
        date,
        completed,
    })
}

fn delete_habit_with_path(path: &Path, id: &str) -> Result<Habit, AppError> {
    let mut state = open(path)?;
    let removed = state
        .document()
        .habit(id.trim())
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("habit not found: {}", id.trim())))?;
    state.apply(Operation::DeleteHabit { id: id.to_string() })?;
    Ok(removed)
}

fn add_task_with_path(
    path: &Path,
    title: &str,
    due_date: Option<&str>,
    category: TaskCategory,
) -> Result<Task, AppError> {
    let task = NewTask {
        category: Some(category),
        due_date: due_date.map(str::to_string),
        ..NewTask::titled(title)
    };

    let mut state = open(path)?;
    let document = state.apply(Operation::Task { task })?;
    document
        .tasks
        .last()
        .cloned()
        .ok_or_else(|| AppError::invalid_data("task was not stored"))
}

fn toggle_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let mut state = open(path)?;
    let document = state.apply(Operation::ToggleTask { id: id.to_string() })?;
    find_task(document, id)
}

fn delete_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let mut state = open(path)?;
    let removed = find_task(state.document(), id)?;
    state.apply(Operation::DeleteTask { id: id.to_string() })?;
    Ok(removed)
}

fn reschedule_task_with_path(path: &Path, id: &str, due_date: &str) -> Result<Task, AppError> {
    let mut state = open(path)?;
    let document = state.apply(Operation::RescheduleTask {
        id: id.to_string(),
        due_date: due_date.to_string(),
    })?;
    find_task(document, id)
}

fn tasks_due_on_with_path(path: &Path, date: Option<&str>) -> Result<Vec<Task>, AppError> {
    let date = calendar::date_or_today(date, calendar::today())?;
    let document = json_store::load_document(path)?;
    Ok(document
        .tasks
        .into_iter()
        .filter(|task| task.is_due_on(&date))
        .collect())
}

fn add_workflow_tasks_with_path(
    path: &Path,
    input: &str,
    status: WorkflowStatus,
) -> Result<Vec<WorkflowTask>, AppError> {
    let operation = board::add_operation(input, status)?;
    let mut state = open(path)?;
    let before = state.workflow_tasks().len();
    let document = state.apply(operation)?;
    Ok(document.workflow_tasks[before..].to_vec())
}

fn move_workflow_task_with_path(
    path: &Path,
    id: &str,
    status: WorkflowStatus,
) -> Result<WorkflowTask, AppError> {
    let mut state = open(path)?;
    let document = state.apply(Operation::MoveWorkflowTask {
        id: id.to_string(),
        status,
    })?;
    find_workflow_task(document, id)
}

fn delete_workflow_task_with_path(path: &Path, id: &str) -> Result<WorkflowTask, AppError> {
    let mut state = open(path)?;
    let removed = find_workflow_task(state.document(), id)?;
    state.apply(Operation::DeleteWorkflowTask { id: id.to_string() })?;
    Ok(removed)
}

fn daily_progress_with_path(path: &Path, date: Option<&str>) -> Result<DailyProgress, AppError> {
    let date = calendar::date_or_today(date, calendar::today())?;
    let document = json_store::load_document(path)?;
    Ok(DailyProgress::calculate(&document, &date))
}

fn find_task(document: &Document, id: &str) -> Result<Task, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    document
        .task(trimmed_id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("task not found: {trimmed_id}")))
}

fn find_workflow_task(document: &Document, id: &str) -> Result<WorkflowTask, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    document
        .workflow_task(trimmed_id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("workflow task not found: {trimmed_id}")))
}
