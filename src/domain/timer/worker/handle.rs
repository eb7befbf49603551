use std::fmt::{Debug, Formatter, Result as FmtResult};

use snafu::prelude::*;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Sender as OneshotSender};
use tokio::sync::watch::Receiver as WatchReceiver;

use crate::domain::entity::{Task, TaskId};
use crate::domain::timer::engine::{DoneCallback, TimerState};

/// Actions that a [`WorkerRoutine`] runs.
///
/// [`WorkerRoutine`]: super::routine::WorkerRoutine
pub enum Command {
    Start {
        responder: OneshotSender<bool>,
    },
    Stop {
        responder: OneshotSender<bool>,
    },
    Focus {
        id: TaskId,
        responder: OneshotSender<Option<Task>>,
    },
    ClearFocus {
        responder: OneshotSender<()>,
    },
    OnDone {
        callback: DoneCallback,
        responder: OneshotSender<()>,
    },
    Shutdown {
        responder: OneshotSender<()>,
    },
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Start { .. } => f.write_str("Start"),
            Self::Stop { .. } => f.write_str("Stop"),
            Self::Focus { id, .. } => f.debug_struct("Focus").field("id", id).finish(),
            Self::ClearFocus { .. } => f.write_str("ClearFocus"),
            Self::OnDone { .. } => f.write_str("OnDone"),
            Self::Shutdown { .. } => f.write_str("Shutdown"),
        }
    }
}

/// Handle that controls a [`WorkerRoutine`] and observes its timer.
///
/// [`WorkerRoutine`]: super::routine::WorkerRoutine
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    requester: Sender<Command>,
    snapshots: WatchReceiver<TimerState>,
}

impl WorkerHandle {
    /// Creates a new [`WorkerHandle`].
    pub fn new(requester: Sender<Command>, snapshots: WatchReceiver<TimerState>) -> Self {
        Self {
            requester,
            snapshots,
        }
    }

    /// Send [`Command::Start`] to the background worker. Returns `false` if
    /// the timer was already running.
    ///
    /// # Errors
    ///
    /// This function will return an error if the worker has shut down.
    pub async fn start(&self) -> Result<bool, WorkerError> {
        self.request(|responder| Command::Start { responder }).await
    }

    /// Send [`Command::Stop`] to the background worker. Returns `false` if
    /// the timer was not running.
    ///
    /// # Errors
    ///
    /// This function will return an error if the worker has shut down.
    pub async fn stop(&self) -> Result<bool, WorkerError> {
        self.request(|responder| Command::Stop { responder }).await
    }

    /// Send [`Command::Focus`] to the background worker and credit following
    /// work phases to the task `id`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the task doesn't exist or the
    /// worker has shut down.
    pub async fn focus(&self, id: TaskId) -> Result<Task, WorkerError> {
        self.request(|responder| Command::Focus { id, responder })
            .await?
            .context(TaskNotFoundSnafu { id })
    }

    /// Send [`Command::ClearFocus`] to the background worker.
    ///
    /// # Errors
    ///
    /// This function will return an error if the worker has shut down.
    pub async fn clear_focus(&self) -> Result<(), WorkerError> {
        self.request(|responder| Command::ClearFocus { responder })
            .await
    }

    /// Send [`Command::OnDone`] to the background worker, replacing the
    /// previously registered callback.
    ///
    /// # Errors
    ///
    /// This function will return an error if the worker has shut down.
    pub async fn on_done(&self, callback: DoneCallback) -> Result<(), WorkerError> {
        self.request(|responder| Command::OnDone {
            callback,
            responder,
        })
        .await
    }

    /// Send [`Command::Shutdown`] to the background worker and wait until it
    /// acknowledges.
    ///
    /// # Errors
    ///
    /// This function will return an error if the worker has already shut down.
    pub async fn shutdown(&self) -> Result<(), WorkerError> {
        self.request(|responder| Command::Shutdown { responder })
            .await
    }

    /// Returns the latest published state of the timer.
    pub fn snapshot(&self) -> TimerState {
        self.snapshots.borrow().clone()
    }

    /// Returns a receiver notified every time the timer state changes.
    pub fn subscribe(&self) -> WatchReceiver<TimerState> {
        self.snapshots.clone()
    }

    async fn request<T, F>(&self, build: F) -> Result<T, WorkerError>
    where
        F: FnOnce(OneshotSender<T>) -> Command,
    {
        let (responder, receiver) = oneshot::channel();
        let command = build(responder);
        tracing::debug!(?command, "Sending command to timer worker");
        self.requester
            .send(command)
            .await
            .map_err(|_| ClosedSnafu.build())?;
        receiver.await.map_err(|_| ClosedSnafu.build())
    }
}

/// An error type of requesting the background worker.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum WorkerError {
    #[snafu(display("Timer worker has shut down"))]
    #[non_exhaustive]
    Closed,
    #[snafu(display("Could not focus on missing task {id}"))]
    #[non_exhaustive]
    TaskNotFound { id: TaskId },
}
