use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entity::{Task, TaskId};
use crate::domain::repository::TaskRepository;

/// A [`TaskRepository`] implementation which keeps tasks in memory for the
/// lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    tasks: BTreeMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty [`InMemoryTaskRepository`].
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the map consistent, so a poisoned lock is
    // still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn next_id(&self) -> TaskId {
        let mut inner = self.lock();
        let id = TaskId::new(inner.last_id);
        inner.last_id += 1;
        id
    }

    fn save(&self, task: Task) -> Task {
        self.lock().tasks.insert(task.id(), task.clone());
        task
    }

    fn get(&self, id: TaskId) -> Option<Task> {
        self.lock().tasks.get(&id).cloned()
    }

    fn update(&self, id: TaskId, f: &mut dyn FnMut(Task) -> Task) -> Option<Task> {
        let mut inner = self.lock();
        let task = f(inner.tasks.get(&id)?.clone());
        inner.tasks.insert(id, task.clone());
        Some(task)
    }

    fn delete(&self, id: TaskId) {
        self.lock().tasks.remove(&id);
    }

    fn all(&self) -> Vec<Task> {
        self.lock().tasks.values().cloned().collect()
    }
}
