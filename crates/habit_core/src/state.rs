//! Single owner of the in-memory document.
//!
//! [`HabitState`] applies operations, hands the result to a [`Persistence`]
//! backend and publishes a [`Change`] snapshot of the touched collection to
//! every subscriber. Subscribers receive the current snapshots as soon as
//! they subscribe.

use crate::error::AppError;
use crate::model::{Document, Habit, Task, WorkflowTask};
use crate::operation::{Collection, Operation};
use crate::storage::json_store;
use std::path::PathBuf;
use std::sync::mpsc;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Habits(Vec<Habit>),
    Tasks(Vec<Task>),
    WorkflowTasks(Vec<WorkflowTask>),
}

impl Change {
    fn snapshot(document: &Document, collection: Collection) -> Self {
        match collection {
            Collection::Habits => Self::Habits(document.habits.clone()),
            Collection::Tasks => Self::Tasks(document.tasks.clone()),
            Collection::WorkflowTasks => Self::WorkflowTasks(document.workflow_tasks.clone()),
        }
    }
}

/// Receiving end of the change stream.
#[derive(Debug)]
pub struct ChangeFeed {
    receiver: mpsc::Receiver<Change>,
}

impl ChangeFeed {
    /// Changes published since the last call, without blocking.
    pub fn pending(&self) -> impl Iterator<Item = Change> + '_ {
        self.receiver.try_iter()
    }
}

pub trait Persistence {
    fn load(&self) -> Result<Document, AppError>;

    fn save(&mut self, document: &Document) -> Result<(), AppError>;
}

/// Whole-document JSON file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(json_store::store_path()?))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<Document, AppError> {
        json_store::load_document(&self.path)
    }

    fn save(&mut self, document: &Document) -> Result<(), AppError> {
        json_store::save_document(&self.path, document)
    }
}

/// Keeps the last saved document in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemory {
    pub document: Document,
    pub saves: usize,
}

impl Persistence for InMemory {
    fn load(&self) -> Result<Document, AppError> {
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &Document) -> Result<(), AppError> {
        self.document = document.clone();
        self.saves += 1;
        Ok(())
    }
}

pub struct HabitState<P: Persistence> {
    document: Document,
    persistence: P,
    subscribers: Vec<mpsc::Sender<Change>>,
}

impl<P: Persistence> HabitState<P> {
    pub fn open(persistence: P) -> Result<Self, AppError> {
        let document = persistence.load()?;
        Ok(Self {
            document,
            persistence,
            subscribers: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn habits(&self) -> &[Habit] {
        &self.document.habits
    }

    pub fn tasks(&self) -> &[Task] {
        &self.document.tasks
    }

    pub fn workflow_tasks(&self) -> &[WorkflowTask] {
        &self.document.workflow_tasks
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn subscribe(&mut self) -> ChangeFeed {
        let (sender, receiver) = mpsc::channel();
        for collection in [
            Collection::Habits,
            Collection::Tasks,
            Collection::WorkflowTasks,
        ] {
            // The receiver is alive in this scope; send cannot fail.
            let _ = sender.send(Change::snapshot(&self.document, collection));
        }
        self.subscribers.push(sender);
        ChangeFeed { receiver }
    }

    pub fn apply(&mut self, operation: Operation) -> Result<&Document, AppError> {
        self.apply_at(operation, crate::calendar::now_local())
    }

    /// Applies, persists, then publishes; nothing changes if either step fails.
    pub fn apply_at(
        &mut self,
        operation: Operation,
        now: OffsetDateTime,
    ) -> Result<&Document, AppError> {
        let kind = operation.kind();
        let collection = operation.collection();

        let mut next = self.document.clone();
        if let Err(err) = next.apply_at(operation, now) {
            tracing::warn!(operation = kind, error = %err, "operation rejected");
            return Err(err);
        }
        self.persistence.save(&next)?;
        self.document = next;
        tracing::info!(operation = kind, "operation applied");

        self.publish(Change::snapshot(&self.document, collection));
        Ok(&self.document)
    }

    fn publish(&mut self, change: Change) {
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }
}
