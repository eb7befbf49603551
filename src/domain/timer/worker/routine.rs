use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tokio::sync::watch::Sender as WatchSender;
use tokio::task::JoinHandle;

use crate::domain::timer::clock::Clock;
use crate::domain::timer::engine::{TimerEngine, TimerState};
use crate::domain::timer::worker::handle::Command;
use crate::domain::timer::worker::state::WorkerState;
use crate::domain::todo::TodoService;

/// A [`WorkerContext`] stores all objects relavent to the [`WorkerRoutine`]
/// and the business logic.
pub struct WorkerContext {
    pub engine: TimerEngine,
    pub todos: Arc<TodoService>,
    pub clock: Arc<dyn Clock>,
    pub commands: Receiver<Command>,
    pub snapshots: WatchSender<TimerState>,
}

impl WorkerContext {
    /// Publish the current engine state to every observer.
    pub fn publish(&self) {
        self.snapshots.send_replace(self.engine.state().clone());
    }
}

/// A type driving the [`TimerEngine`] on background. A [`WorkerRoutine`]
/// serializes every [`Command`] received from [`WorkerHandle`]s and ticks the
/// engine once per second while a phase runs.
///
/// [`WorkerHandle`]: super::handle::WorkerHandle
pub struct WorkerRoutine {
    context: WorkerContext,
    state: WorkerState,
}

impl WorkerRoutine {
    /// Spawn a running [`WorkerRoutine`] on background.
    pub fn spawn(
        engine: TimerEngine,
        todos: Arc<TodoService>,
        clock: Arc<dyn Clock>,
        commands: Receiver<Command>,
        snapshots: WatchSender<TimerState>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut worker = Self {
                context: WorkerContext {
                    engine,
                    todos,
                    clock,
                    commands,
                    snapshots,
                },
                state: WorkerState::new(),
            };
            worker.run().await;
        })
    }

    /// Main part of its business logic.
    async fn run(&mut self) {
        while !self.state.is_stopped() {
            self.state.run(&mut self.context).await;
        }
        tracing::debug!("Timer worker stopped");
    }
}
