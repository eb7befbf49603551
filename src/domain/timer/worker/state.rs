use tokio::sync::oneshot::Sender;
use tokio::time::{Duration, Interval, MissedTickBehavior};

use crate::domain::timer::worker::handle::Command;
use crate::domain::timer::worker::routine::WorkerContext;

/// How often a running timer gets ticked.
const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
#[repr(transparent)]
pub struct WorkerState {
    inner: Option<WorkerStateInner>,
}

impl WorkerState {
    /// Creates a new [`WorkerState`].
    pub fn new() -> Self {
        Self {
            inner: Some(WorkerStateInner::new()),
        }
    }

    /// Do the business logic based on its inner state.
    pub async fn run(&mut self, context: &mut WorkerContext) {
        self.inner = match self.inner.take() {
            Some(inner) => Some(inner.run(context).await),
            None => unreachable!("`WorkerState`'s inner should not be `None`"),
        };
    }

    /// Returns `true` if is stopped of this [`WorkerState`].
    pub fn is_stopped(&self) -> bool {
        matches!(self.inner, Some(WorkerStateInner::Stopped(_)))
    }
}

#[enum_dispatch::enum_dispatch]
trait StateRun {
    async fn run(self, context: &mut WorkerContext) -> WorkerStateInner;
}

/// Actual implementation of running state of [`WorkerRoutine`].
///
/// [`WorkerRoutine`]: super::routine::WorkerRoutine
#[derive(Debug)]
#[enum_dispatch::enum_dispatch(StateRun)]
enum WorkerStateInner {
    Idle(IdleState),
    Running(RunningState),
    Stopped(StoppedState),
}

impl WorkerStateInner {
    pub fn new() -> Self {
        Self::Idle(IdleState)
    }
}

/// A state which indicates that the timer is armed or waiting, so only
/// commands can change it.
#[derive(Debug)]
struct IdleState;

impl StateRun for IdleState {
    async fn run(self, context: &mut WorkerContext) -> WorkerStateInner {
        match context.commands.recv().await {
            Some(command) => match handle_command(context, command) {
                Handled::Continue => self.resume(context),
                Handled::Shutdown => StoppedState.into(),
            },
            None => StoppedState.into(),
        }
    }
}

impl IdleState {
    fn resume(self, context: &WorkerContext) -> WorkerStateInner {
        if context.engine.is_running() {
            RunningState::new().into()
        } else {
            self.into()
        }
    }
}

/// A state which indicates that a phase is running, with a ticker polling the
/// engine internally.
#[derive(Debug)]
struct RunningState {
    timer: Interval,
}

impl StateRun for RunningState {
    async fn run(mut self, context: &mut WorkerContext) -> WorkerStateInner {
        tokio::select! {
            _ = self.timer.tick() => self.handle_tick(context),
            command = context.commands.recv() => match command {
                Some(command) => match handle_command(context, command) {
                    Handled::Continue => self.resume(context),
                    Handled::Shutdown => StoppedState.into(),
                },
                None => StoppedState.into(),
            },
        }
    }
}

impl RunningState {
    fn new() -> Self {
        let mut timer = tokio::time::interval(TICK_PERIOD);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { timer }
    }

    fn handle_tick(self, context: &mut WorkerContext) -> WorkerStateInner {
        let now = context.clock.now();
        if context.engine.tick(now) {
            tracing::debug!(%now, "Timer phase ran out");
        }
        context.publish();
        self.resume(context)
    }

    fn resume(self, context: &WorkerContext) -> WorkerStateInner {
        if context.engine.is_running() {
            self.into()
        } else {
            IdleState.into()
        }
    }
}

/// A state which indicates that [`WorkerRoutine`] should stop running.
///
/// [`WorkerRoutine`]: super::routine::WorkerRoutine
#[derive(Debug)]
struct StoppedState;

impl StateRun for StoppedState {
    async fn run(self, _context: &mut WorkerContext) -> WorkerStateInner {
        self.into()
    }
}

enum Handled {
    Continue,
    Shutdown,
}

fn handle_command(context: &mut WorkerContext, command: Command) -> Handled {
    match command {
        Command::Start { responder } => {
            let started = context.engine.start(context.clock.now());
            reply(context, responder, started);
        }
        Command::Stop { responder } => {
            let stopped = context.engine.stop();
            reply(context, responder, stopped);
        }
        Command::Focus { id, responder } => {
            let task = context.todos.get(id);
            match &task {
                Some(task) => context.engine.set_focus(task.clone()),
                None => tracing::warn!(%id, "Could not focus on missing task"),
            }
            reply(context, responder, task);
        }
        Command::ClearFocus { responder } => {
            context.engine.clear_focus();
            reply(context, responder, ());
        }
        Command::OnDone { callback, responder } => {
            context.engine.on_done(callback);
            reply(context, responder, ());
        }
        Command::Shutdown { responder } => {
            let _ = responder.send(());
            return Handled::Shutdown;
        }
    }
    Handled::Continue
}

/// Publish the new state before answering, so that a requester reading the
/// snapshot after its reply never sees a stale one.
fn reply<T>(context: &WorkerContext, responder: Sender<T>, value: T) {
    context.publish();
    let _ = responder.send(value);
}
