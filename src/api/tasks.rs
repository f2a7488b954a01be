//! Background task records for asynchronous synthesis.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle state of a background synthesis task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskState {
    fn rank(self) -> u8 {
        match self {
            TaskState::Pending => 0,
            TaskState::Processing => 1,
            TaskState::Completed | TaskState::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }
}

/// Outcome of a completed task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub audio_url: String,
    pub processing_time_secs: f64,
    pub file_size: u64,
}

/// One asynchronous synthesis task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub status: TaskState,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// In-memory task store.
///
/// Status is monotonic over pending → processing → completed|failed:
/// updates that would move backward, or touch a terminal record, are
/// ignored. Progress never decreases.
#[derive(Default)]
pub struct TaskStore {
    tasks: Mutex<HashMap<Uuid, TaskRecord>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending task.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let record = TaskRecord {
            id,
            status: TaskState::Pending,
            progress: 0,
            created_at: Utc::now(),
            result: None,
            error: None,
        };
        self.lock().insert(id, record);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<TaskRecord> {
        self.lock().get(&id).cloned()
    }

    /// Move a task forward. No-op for unknown tasks, terminal tasks,
    /// and backward transitions.
    pub fn advance(&self, id: Uuid, status: TaskState, progress: u8) {
        let mut tasks = self.lock();
        if let Some(record) = tasks.get_mut(&id)
            && !record.status.is_terminal()
            && status.rank() >= record.status.rank()
        {
            record.status = status;
            record.progress = record.progress.max(progress);
        }
    }

    /// Mark a task completed with its result.
    pub fn complete(&self, id: Uuid, result: TaskResult) {
        let mut tasks = self.lock();
        if let Some(record) = tasks.get_mut(&id)
            && !record.status.is_terminal()
        {
            record.status = TaskState::Completed;
            record.progress = 100;
            record.result = Some(result);
        }
    }

    /// Mark a task failed with an error message.
    pub fn fail(&self, id: Uuid, error: impl Into<String>) {
        let mut tasks = self.lock();
        if let Some(record) = tasks.get_mut(&id)
            && !record.status.is_terminal()
        {
            record.status = TaskState::Failed;
            record.progress = 100;
            record.error = Some(error.into());
        }
    }

    /// Remove records created strictly before `cutoff`. Returns the
    /// number removed.
    pub fn sweep(&self, cutoff: DateTime<Utc>) -> usize {
        let mut tasks = self.lock();
        let before = tasks.len();
        tasks.retain(|_, record| record.created_at >= cutoff);
        before - tasks.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, TaskRecord>> {
        self.tasks.lock().expect("task store mutex poisoned")
    }
}
