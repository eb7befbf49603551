use std::sync::Arc;

use snafu::prelude::*;

use crate::domain::entity::{Interval, Task, TaskId};
use crate::domain::repository::{TaskRepository, TaskRepositoryExt};

/// Which tasks a listing should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl TaskFilter {
    fn accepts(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.is_done(),
            Self::Done => task.is_done(),
        }
    }
}

/// Task-level operations shared by the timer and the to-do list.
pub struct TodoService {
    repository: Arc<dyn TaskRepository>,
}

impl TodoService {
    /// Creates a new [`TodoService`].
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Create a pending task without intervals and store it.
    pub fn add(&self, title: String, description: String) -> Task {
        let id = self.repository.next_id();
        let task = self.repository.save(Task::new(id, title, description));
        tracing::debug!(%id, "Added task");
        task
    }

    /// Set the completion flag of a task.
    ///
    /// # Errors
    ///
    /// This function will return an error if the task doesn't exist.
    pub fn switch(&self, id: TaskId, done: bool) -> Result<Task, SwitchTaskError> {
        let task = self
            .repository
            .update(id, &mut |task| task.with_done(done))
            .context(NotFoundSnafu { id })?;
        tracing::debug!(%id, done, "Switched task");
        Ok(task)
    }

    /// Append an interval to a task. Returns `None` if the task no longer
    /// exists.
    pub fn add_interval(&self, id: TaskId, interval: Interval) -> Option<Task> {
        self.repository
            .update(id, &mut |task| task.with_interval(interval.clone()))
    }

    /// List tasks matching `filter`, pending ones first.
    pub fn list(&self, filter: TaskFilter) -> Vec<Task> {
        self.repository
            .get_all(|task| task.is_done())
            .into_iter()
            .filter(|task| filter.accepts(task))
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.repository.get(id)
    }

    pub fn delete(&self, id: TaskId) {
        self.repository.delete(id);
    }
}

/// An error type of switching the completion flag of a task.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum SwitchTaskError {
    #[snafu(display("Could not find task {id}"))]
    #[non_exhaustive]
    NotFound { id: TaskId },
}
