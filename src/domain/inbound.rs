use tokio::sync::watch::Receiver;

use crate::domain::entity::{Task, TaskId};
use crate::domain::timer::{DoneCallback, TimerState, WorkerError};
use crate::domain::todo::{SwitchTaskError, TaskFilter};

/// A public port for managing the to-do list.
#[async_trait::async_trait]
pub trait TaskPort: Send + Sync + 'static {
    /// Add a pending task.
    async fn add(&self, title: String, description: String) -> Task;

    /// Mark a task as done or pending.
    ///
    /// # Errors
    ///
    /// This function will return an error if the task doesn't exist.
    async fn switch(&self, id: TaskId, done: bool) -> Result<Task, SwitchTaskError>;

    /// List tasks, pending ones first.
    async fn list(&self, filter: TaskFilter) -> Vec<Task>;

    /// Look up one task.
    async fn get(&self, id: TaskId) -> Option<Task>;

    /// Remove a task. Removing an absent task does nothing.
    async fn delete(&self, id: TaskId);
}

/// A public port for driving and observing the tomato timer.
#[async_trait::async_trait]
pub trait TimerPort: Send + Sync + 'static {
    /// Start the armed phase. Returns `false` if a phase is already running.
    ///
    /// # Errors
    ///
    /// This function will return an error if the timer has shut down.
    async fn start(&self) -> Result<bool, WorkerError>;

    /// Interrupt the running phase. Returns `false` if no phase is running.
    ///
    /// # Errors
    ///
    /// This function will return an error if the timer has shut down.
    async fn stop(&self) -> Result<bool, WorkerError>;

    /// Credit following work phases to a task.
    ///
    /// # Errors
    ///
    /// This function will return an error if the task doesn't exist or the
    /// timer has shut down.
    async fn focus(&self, id: TaskId) -> Result<Task, WorkerError>;

    /// Stop crediting work phases to any task.
    ///
    /// # Errors
    ///
    /// This function will return an error if the timer has shut down.
    async fn clear_focus(&self) -> Result<(), WorkerError>;

    /// Register the callback invoked whenever a phase runs out, replacing the
    /// previous one.
    ///
    /// # Errors
    ///
    /// This function will return an error if the timer has shut down.
    async fn on_done(&self, callback: DoneCallback) -> Result<(), WorkerError>;

    /// Stop the timer worker for good.
    ///
    /// # Errors
    ///
    /// This function will return an error if the timer has already shut down.
    async fn shutdown(&self) -> Result<(), WorkerError>;

    /// The latest state of the timer, with the focused task read back from
    /// the store.
    fn snapshot(&self) -> TimerState;

    /// A receiver notified every time the timer state changes.
    fn subscribe(&self) -> Receiver<TimerState>;
}
