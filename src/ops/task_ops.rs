use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store::{JsonStore, StoreError};
use crate::model::task::Task;

/// Error type for to-do operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("please enter a valid task")]
    EmptyText,
    #[error("task '{0}' already exists")]
    Duplicate(String),
    #[error("invalid task number {0}")]
    InvalidOrdinal(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Append a task. Text is trimmed; a case-insensitive duplicate is rejected.
pub fn add_task(store: &JsonStore<Task>, text: &str) -> Result<Task, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }

    let _lock = store.lock()?;
    let mut tasks = store.load()?;
    if tasks.iter().any(|t| t.matches_text(text)) {
        return Err(TaskError::Duplicate(text.to_string()));
    }

    let task = Task::new(text.to_string());
    tasks.push(task.clone());
    store.save(&tasks)?;
    log::info!("added task {}: {}", tasks.len(), task.text);
    Ok(task)
}

/// Tasks paired with their 1-based ordinal. Completed tasks are skipped
/// unless `show_completed`; ordinals always count every task.
pub fn list_tasks(
    store: &JsonStore<Task>,
    show_completed: bool,
) -> Result<Vec<(usize, Task)>, StoreError> {
    Ok(store
        .load()?
        .into_iter()
        .enumerate()
        .map(|(i, t)| (i + 1, t))
        .filter(|(_, t)| show_completed || !t.done)
        .collect())
}

/// Mark the task at `ordinal` done. Rewrites the store even when it was
/// already done.
pub fn complete_task(store: &JsonStore<Task>, ordinal: usize) -> Result<Task, TaskError> {
    let _lock = store.lock()?;
    let mut tasks = store.load()?;
    let idx = index_for(ordinal, tasks.len())?;
    tasks[idx].done = true;
    store.save(&tasks)?;
    log::info!("completed task {}: {}", ordinal, tasks[idx].text);
    Ok(tasks[idx].clone())
}

/// Remove the task at `ordinal`; later tasks move up one place.
pub fn delete_task(store: &JsonStore<Task>, ordinal: usize) -> Result<Task, TaskError> {
    let _lock = store.lock()?;
    let mut tasks = store.load()?;
    let idx = index_for(ordinal, tasks.len())?;
    let removed = tasks.remove(idx);
    store.save(&tasks)?;

    log_removed(store, &format!("task {} deleted", ordinal), std::slice::from_ref(&removed));
    Ok(removed)
}

/// Drop every task, whatever state the file is in. Returns how many were removed.
pub fn clear_tasks(store: &JsonStore<Task>) -> Result<usize, TaskError> {
    let _lock = store.lock()?;
    let removed = store.load().unwrap_or_default();
    store.save(&[])?;
    if !removed.is_empty() {
        log_removed(store, "all tasks cleared", &removed);
    }
    Ok(removed.len())
}

fn index_for(ordinal: usize, len: usize) -> Result<usize, TaskError> {
    if ordinal == 0 || ordinal > len {
        return Err(TaskError::InvalidOrdinal(ordinal));
    }
    Ok(ordinal - 1)
}

fn log_removed(store: &JsonStore<Task>, description: &str, tasks: &[Task]) {
    let body = serde_json::to_string_pretty(tasks).unwrap_or_default();
    recovery::log_recovery(
        store.data_dir(),
        RecoveryEntry::new(RecoveryCategory::Delete, description)
            .field("Store", store.name())
            .body(body),
    );
}
