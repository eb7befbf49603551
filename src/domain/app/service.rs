use std::sync::Arc;

use tokio::sync::watch::Receiver;

use crate::domain::entity::{Task, TaskId};
use crate::domain::inbound::{TaskPort, TimerPort};
use crate::domain::timer::{DoneCallback, TimerState, WorkerError, WorkerHandle};
use crate::domain::todo::{SwitchTaskError, TaskFilter, TodoService};

pub struct TaskService {
    todos: Arc<TodoService>,
}

impl TaskService {
    pub fn new(todos: Arc<TodoService>) -> Self {
        Self { todos }
    }
}

#[async_trait::async_trait]
impl TaskPort for TaskService {
    async fn add(&self, title: String, description: String) -> Task {
        self.todos.add(title, description)
    }

    async fn switch(&self, id: TaskId, done: bool) -> Result<Task, SwitchTaskError> {
        self.todos.switch(id, done)
    }

    async fn list(&self, filter: TaskFilter) -> Vec<Task> {
        self.todos.list(filter)
    }

    async fn get(&self, id: TaskId) -> Option<Task> {
        self.todos.get(id)
    }

    async fn delete(&self, id: TaskId) {
        self.todos.delete(id)
    }
}

pub struct TimerService {
    worker: Arc<WorkerHandle>,
    todos: Arc<TodoService>,
}

impl TimerService {
    pub fn new(worker: Arc<WorkerHandle>, todos: Arc<TodoService>) -> Self {
        Self { worker, todos }
    }
}

#[async_trait::async_trait]
impl TimerPort for TimerService {
    async fn start(&self) -> Result<bool, WorkerError> {
        self.worker.start().await
    }

    async fn stop(&self) -> Result<bool, WorkerError> {
        self.worker.stop().await
    }

    async fn focus(&self, id: TaskId) -> Result<Task, WorkerError> {
        self.worker.focus(id).await
    }

    async fn clear_focus(&self) -> Result<(), WorkerError> {
        self.worker.clear_focus().await
    }

    async fn on_done(&self, callback: DoneCallback) -> Result<(), WorkerError> {
        self.worker.on_done(callback).await
    }

    async fn shutdown(&self) -> Result<(), WorkerError> {
        self.worker.shutdown().await
    }

    fn snapshot(&self) -> TimerState {
        let mut state = self.worker.snapshot();
        state.refresh_focus(&self.todos);
        state
    }

    fn subscribe(&self) -> Receiver<TimerState> {
        self.worker.subscribe()
    }
}
