mod handle;
mod routine;
mod state;

pub use handle::{WorkerError, WorkerHandle};

use std::sync::Arc;

use snafu::prelude::*;

use crate::domain::entity::{PhaseKind, TimerSettings};
use crate::domain::repository::settings::{GetSettingsError, SettingsRepository};
use crate::domain::timer::clock::Clock;
use crate::domain::timer::engine::TimerEngine;
use crate::domain::todo::TodoService;

use routine::WorkerRoutine;

/// Load the timer settings and spawn the background worker owning the
/// timer engine.
///
/// # Errors
///
/// This function will return an error if the settings could not be loaded.
pub async fn spawn(
    settings_repository: Arc<dyn SettingsRepository>,
    todos: Arc<TodoService>,
    clock: Arc<dyn Clock>,
) -> Result<WorkerHandle, SpawnWorkerError> {
    let settings = load_settings(settings_repository).await?;
    Ok(spawn_with_settings(settings, todos, clock))
}

/// Spawn the background worker with already loaded settings.
pub fn spawn_with_settings(
    settings: TimerSettings,
    todos: Arc<TodoService>,
    clock: Arc<dyn Clock>,
) -> WorkerHandle {
    let (requester, commands) = tokio::sync::mpsc::channel(1);
    let engine = TimerEngine::new(settings, Arc::clone(&todos));
    let (snapshots, observer) = tokio::sync::watch::channel(engine.state().clone());
    WorkerRoutine::spawn(engine, todos, clock, commands, snapshots);
    WorkerHandle::new(requester, observer)
}

async fn load_settings(
    repository: Arc<dyn SettingsRepository>,
) -> Result<TimerSettings, SpawnWorkerError> {
    let work_duration = repository
        .phase_duration(PhaseKind::Work)
        .await
        .context(DurationConfigSnafu {
            key: PhaseKind::Work,
        })?;
    let short_rest_duration = repository
        .phase_duration(PhaseKind::ShortRest)
        .await
        .context(DurationConfigSnafu {
            key: PhaseKind::ShortRest,
        })?;
    let long_rest_duration = repository
        .phase_duration(PhaseKind::LongRest)
        .await
        .context(DurationConfigSnafu {
            key: PhaseKind::LongRest,
        })?;
    let cycle = repository.cycle().await.context(CycleConfigSnafu)?;

    tracing::debug!(
        work = ?work_duration.inner(),
        short_rest = ?short_rest_duration.inner(),
        long_rest = ?long_rest_duration.inner(),
        ?cycle,
        "Loaded timer settings"
    );

    Ok(TimerSettings {
        work_duration,
        short_rest_duration,
        long_rest_duration,
        cycle,
    })
}

/// An error for spawning the background worker.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SpawnWorkerError {
    #[snafu(display("Could not load {key} duration from repository"))]
    DurationConfig {
        key: PhaseKind,
        source: GetSettingsError,
    },
    #[snafu(display("Could not load cycle configuration from repository"))]
    CycleConfig { source: GetSettingsError },
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use crate::adapter::repository::InMemoryTaskRepository;
    use crate::domain::entity::{CycleSettings, PhaseDuration, TimerPhase};
    use crate::domain::repository::settings::MockSettingsRepository;
    use crate::domain::timer::clock::TokioClock;

    #[tokio::test(start_paused = true)]
    async fn worker_credits_focused_task() {
        let (handle, todos) = spawn_worker(false);
        let task = todos.add("task".into(), "".into());
        let done = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&done);

        handle
            .on_done(Box::new(move |phase| sink.lock().unwrap().push(phase)))
            .await
            .unwrap();
        assert_eq!(handle.focus(task.id()).await.unwrap(), task);
        assert!(handle.start().await.unwrap());
        assert!(!handle.start().await.unwrap());
        assert!(handle.snapshot().is_running());

        let mut observer = handle.subscribe();
        observer
            .wait_for(|state| state.phase() == TimerPhase::WaitShortRest)
            .await
            .unwrap();

        let task = todos.get(task.id()).unwrap();
        assert_eq!(task.intervals().len(), 1);
        assert!(task.intervals()[0].is_done());
        assert_eq!(task.intervals()[0].duration(), Duration::from_secs(3));
        assert_eq!(handle.snapshot().focus(), Some(&task));
        assert_eq!(*done.lock().unwrap(), vec![TimerPhase::Working]);
    }

    #[tokio::test(start_paused = true)]
    async fn worker_auto_continues_into_rest() {
        let (handle, _) = spawn_worker(true);
        handle.start().await.unwrap();

        let mut observer = handle.subscribe();
        observer
            .wait_for(|state| state.phase() == TimerPhase::ShortRest)
            .await
            .unwrap();
        assert!(handle.snapshot().is_running());

        observer
            .wait_for(|state| state.phase() == TimerPhase::WaitWork)
            .await
            .unwrap();
        assert!(!handle.snapshot().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn worker_stop_and_clear_focus() {
        let (handle, todos) = spawn_worker(false);
        let task = todos.add("task".into(), "".into());
        handle.focus(task.id()).await.unwrap();
        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(handle.stop().await.unwrap());
        assert!(!handle.stop().await.unwrap());
        let task = todos.get(task.id()).unwrap();
        assert_eq!(task.intervals().len(), 1);
        assert!(!task.intervals()[0].is_done());

        handle.clear_focus().await.unwrap();
        assert_eq!(handle.snapshot().focus(), None);
        assert_eq!(handle.snapshot().phase(), TimerPhase::WaitShortRest);
    }

    #[tokio::test(start_paused = true)]
    async fn worker_focus_missing_task() {
        let (handle, _) = spawn_worker(false);
        assert_eq!(
            handle.focus(42.into()).await,
            Err(WorkerError::TaskNotFound { id: 42.into() })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn worker_shutdown() {
        let (handle, _) = spawn_worker(false);
        handle.shutdown().await.unwrap();
        assert_eq!(handle.start().await, Err(WorkerError::Closed));
    }

    #[tokio::test]
    async fn worker_spawn_loads_settings() {
        let mut mock = MockSettingsRepository::new();
        mock.expect_phase_duration()
            .returning(|kind| match kind {
                PhaseKind::Work => Ok(PhaseDuration::try_new(50).unwrap()),
                _ => Ok(PhaseDuration::try_new(10).unwrap()),
            });
        mock.expect_cycle()
            .returning(|| Ok(CycleSettings::try_new(2, false, false).unwrap()));

        let todos = Arc::new(TodoService::new(Arc::new(InMemoryTaskRepository::new())));
        let clock = Arc::new(TokioClock::new(Utc::now()));
        let handle = spawn(Arc::new(mock), todos, clock).await.unwrap();
        assert_eq!(handle.snapshot().duration(), Duration::from_secs(50));
    }

    #[tokio::test]
    async fn worker_spawn_reports_failing_key() {
        let mut mock = MockSettingsRepository::new();
        mock.expect_phase_duration().returning(|kind| match kind {
            PhaseKind::LongRest => Err(GetSettingsError::InvalidDuration {
                source: PhaseDuration::try_new(0).unwrap_err(),
            }),
            _ => Ok(PhaseDuration::try_new(10).unwrap()),
        });

        let todos = Arc::new(TodoService::new(Arc::new(InMemoryTaskRepository::new())));
        let clock = Arc::new(TokioClock::new(Utc::now()));
        assert!(matches!(
            spawn(Arc::new(mock), todos, clock).await,
            Err(SpawnWorkerError::DurationConfig {
                key: PhaseKind::LongRest,
                ..
            })
        ));
    }

    fn spawn_worker(auto_start_rest: bool) -> (WorkerHandle, Arc<TodoService>) {
        let new_duration = |d| PhaseDuration::try_new(d).unwrap();
        let settings = TimerSettings {
            work_duration: new_duration(3),
            short_rest_duration: new_duration(2),
            long_rest_duration: new_duration(4),
            cycle: CycleSettings::try_new(4, auto_start_rest, false).unwrap(),
        };
        let todos = Arc::new(TodoService::new(Arc::new(InMemoryTaskRepository::new())));
        let clock = Arc::new(TokioClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        ));
        let handle = spawn_with_settings(settings, Arc::clone(&todos), clock);
        (handle, todos)
    }
}
