use std::sync::Arc;

use snafu::prelude::*;

use crate::domain::app::service::{TaskService, TimerService};
use crate::domain::inbound::{TaskPort, TimerPort};
use crate::domain::repository::{SettingsRepository, TaskRepository};
use crate::domain::timer::worker::{self, SpawnWorkerError};
use crate::domain::timer::Clock;
use crate::domain::todo::TodoService;

/// Entrance to the domain logic, providing ports for external adapters.
pub struct ApplicationCore {
    pub tasks: Arc<dyn TaskPort>,
    pub timer: Arc<dyn TimerPort>,
}

impl ApplicationCore {
    /// Initialize the application by injecting external repositories and
    /// adapters. The task store is shared between the to-do list and the
    /// timer.
    ///
    /// # Errors
    ///
    /// This function will return an error if initialization failed.
    pub async fn setup(
        task_repository: Arc<dyn TaskRepository>,
        settings_repository: Arc<dyn SettingsRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<ApplicationCore, SetupApplicationCoreError> {
        let todos = Arc::new(TodoService::new(task_repository));
        let worker = worker::spawn(settings_repository, Arc::clone(&todos), clock)
            .await
            .context(WorkerSnafu)?;
        let worker = Arc::new(worker);

        let task_port = Arc::new(TaskService::new(Arc::clone(&todos)));
        let timer_port = Arc::new(TimerService::new(worker, todos));

        let app = ApplicationCore {
            tasks: task_port,
            timer: timer_port,
        };

        Ok(app)
    }
}

/// An error for initializing the application.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SetupApplicationCoreError {
    #[snafu(display("Could not spawn a background timer worker"))]
    Worker { source: SpawnWorkerError },
}
