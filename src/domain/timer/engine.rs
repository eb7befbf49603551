use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use snafu::prelude::*;

use crate::domain::entity::{format_clock, Interval, Task, TaskId, TimerPhase, TimerSettings};
use crate::domain::todo::TodoService;

/// Callback invoked with the phase that has just run out.
pub type DoneCallback = Box<dyn FnMut(TimerPhase) + Send + 'static>;

/// Snapshot of a [`TimerEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerState {
    started: Option<DateTime<Utc>>,
    duration: Duration,
    remaining: Duration,
    phase: TimerPhase,
    work_in_line: u32,
    focus: Option<Task>,
}

impl TimerState {
    fn initial(settings: &TimerSettings) -> Self {
        let phase = TimerPhase::initial();
        let duration = settings.duration(phase.kind()).inner();
        Self {
            started: None,
            duration,
            remaining: duration,
            phase,
            work_in_line: 1,
            focus: None,
        }
    }

    /// Returns the moment the current phase started, or `None` if the timer
    /// is not running.
    pub fn started(&self) -> Option<DateTime<Utc>> {
        self.started
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Position of the current or upcoming work phase in the cycle, starting
    /// from 1.
    pub fn work_in_line(&self) -> u32 {
        self.work_in_line
    }

    /// The focused task. Published snapshots carry a copy taken when the
    /// focus was set or a work session was last credited to it.
    pub fn focus(&self) -> Option<&Task> {
        self.focus.as_ref()
    }

    /// Replace the focused copy with the stored task. A focused task missing
    /// from the store is kept as is.
    pub(crate) fn refresh_focus(&mut self, todos: &TodoService) {
        let stored = self.focus.as_ref().and_then(|task| todos.get(task.id()));
        if let Some(task) = stored {
            self.focus = Some(task);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// The remaining time rendered as `MM:SS`.
    pub fn formatted(&self) -> String {
        format_clock(self.remaining)
    }
}

/// The tomato clock state machine. It never reads the clock by itself: time
/// only moves forward through [`TimerEngine::tick`].
pub struct TimerEngine {
    settings: TimerSettings,
    todos: Arc<TodoService>,
    state: TimerState,
    on_done: Option<DoneCallback>,
}

impl TimerEngine {
    /// Creates a new [`TimerEngine`] waiting for the first work phase.
    pub fn new(settings: TimerSettings, todos: Arc<TodoService>) -> Self {
        let state = TimerState::initial(&settings);
        Self {
            settings,
            todos,
            state,
            on_done: None,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Start the armed phase at `now`. Returns `false` and changes nothing if
    /// a phase is already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.phase.is_active() {
            tracing::debug!(phase = %self.state.phase, "Ignored start of a running timer");
            return false;
        }

        let phase = self.next_phase();
        self.enter(phase, Some(now));
        tracing::info!(%phase, work_in_line = self.state.work_in_line, "Phase started");
        true
    }

    /// Interrupt the running phase. An interrupted work phase is credited to
    /// the focused task as unfinished. Returns `false` and changes nothing if
    /// no phase is running.
    pub fn stop(&mut self) -> bool {
        let phase = self.next_phase();
        if phase.is_active() {
            tracing::debug!(phase = %self.state.phase, "Ignored stop of an armed timer");
            return false;
        }

        let stopped = self.state.phase;
        if stopped == TimerPhase::Working {
            self.finish_working(false);
        }
        self.enter(phase, None);
        tracing::info!(%stopped, next = %phase, "Phase interrupted");
        true
    }

    /// Recompute the remaining time at `now`. Returns `true` if the running
    /// phase ran out on this tick.
    ///
    /// When the phase runs out, the next phase is armed, or started right
    /// away at `now` if the settings ask to auto-continue into it.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let Some(started) = self.state.started else {
            return false;
        };

        let elapsed = (now - started).to_std().unwrap_or(Duration::ZERO);
        self.state.remaining = self.state.duration.saturating_sub(elapsed);
        if !self.state.remaining.is_zero() {
            return false;
        }

        let completed = self.state.phase;
        if completed == TimerPhase::Working {
            self.finish_working(true);
        }
        if let Some(callback) = self.on_done.as_mut() {
            callback(completed);
        }

        let phase = self.next_phase();
        self.enter(phase, None);
        if completed == TimerPhase::Working {
            self.state.work_in_line += 1;
        }
        tracing::info!(%completed, next = %phase, "Phase finished");

        if self.auto_continues(phase) {
            self.start(now);
        }
        true
    }

    /// Register the completion callback, replacing any previous one.
    pub fn on_done(&mut self, callback: DoneCallback) {
        self.on_done = Some(callback);
    }

    /// Credit the following work phases to `task`.
    pub fn set_focus(&mut self, task: Task) {
        self.state.focus = Some(task);
    }

    pub fn clear_focus(&mut self) {
        self.state.focus = None;
    }

    fn next_phase(&self) -> TimerPhase {
        self.state
            .phase
            .next(self.state.work_in_line, self.settings.cycle.sequence_length())
    }

    fn enter(&mut self, phase: TimerPhase, started: Option<DateTime<Utc>>) {
        let duration = self.settings.duration(phase.kind()).inner();
        self.state.phase = phase;
        self.state.started = started;
        self.state.duration = duration;
        self.state.remaining = duration;
    }

    fn auto_continues(&self, phase: TimerPhase) -> bool {
        match phase {
            TimerPhase::WaitShortRest | TimerPhase::WaitLongRest => {
                self.settings.cycle.auto_start_rest
            }
            TimerPhase::WaitWork => self.settings.cycle.auto_start_work,
            _ => false,
        }
    }

    /// Record the running work session on the focused task. A focused task
    /// deleted in the meantime is reported and dropped, it never blocks the
    /// phase transition.
    fn finish_working(&mut self, is_done: bool) {
        let (Some(task), Some(start)) = (&self.state.focus, self.state.started) else {
            return;
        };

        let id = task.id();
        let interval = Interval::new(self.state.duration, start, is_done);
        match self.todos.add_interval(id, interval) {
            Some(task) => self.state.focus = Some(task),
            None => {
                let err = FinishWorkingError::DanglingFocus { id };
                crate::tracing_report!(err, "Could not credit work session");
                self.state.focus = None;
            }
        }
    }
}

impl Debug for TimerEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TimerEngine")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("on_done", &self.on_done.is_some())
            .finish_non_exhaustive()
    }
}

/// An error raised while crediting a work session to the focused task.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum FinishWorkingError {
    #[snafu(display("Focused task {id} no longer exists"))]
    #[non_exhaustive]
    DanglingFocus { id: TaskId },
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::sync::Mutex;

    use chrono::{TimeDelta, TimeZone};

    use crate::adapter::repository::InMemoryTaskRepository;
    use crate::domain::entity::{CycleSettings, PhaseDuration};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn secs(seconds: i64) -> TimeDelta {
        TimeDelta::seconds(seconds)
    }

    fn settings(auto_start_rest: bool, auto_start_work: bool) -> TimerSettings {
        let duration = |d| PhaseDuration::try_new(d).unwrap();
        TimerSettings {
            work_duration: duration(25),
            short_rest_duration: duration(5),
            long_rest_duration: duration(15),
            cycle: CycleSettings::try_new(4, auto_start_rest, auto_start_work).unwrap(),
        }
    }

    fn new_engine(settings: TimerSettings) -> (TimerEngine, Arc<TodoService>) {
        let todos = Arc::new(TodoService::new(Arc::new(InMemoryTaskRepository::new())));
        (TimerEngine::new(settings, Arc::clone(&todos)), todos)
    }

    #[test]
    fn engine_initial_state() {
        let (engine, _) = new_engine(settings(false, false));
        let state = engine.state();
        assert_eq!(state.phase(), TimerPhase::WaitWork);
        assert_eq!(state.duration(), Duration::from_secs(25));
        assert_eq!(state.remaining(), Duration::from_secs(25));
        assert_eq!(state.work_in_line(), 1);
        assert_eq!(state.started(), None);
        assert_eq!(state.focus(), None);
        assert_eq!(state.formatted(), "00:25");
    }

    #[test]
    fn engine_start() {
        let (mut engine, _) = new_engine(settings(false, false));
        assert!(engine.start(t0()));

        let state = engine.state().clone();
        assert_eq!(state.phase(), TimerPhase::Working);
        assert_eq!(state.started(), Some(t0()));
        assert_eq!(state.remaining(), Duration::from_secs(25));

        assert!(!engine.start(t0() + secs(3)));
        assert_eq!(engine.state(), &state);
    }

    #[test]
    fn engine_tick_recomputes_remaining() {
        let (mut engine, _) = new_engine(settings(false, false));
        engine.start(t0());

        assert!(!engine.tick(t0() + secs(10)));
        assert_eq!(engine.state().remaining(), Duration::from_secs(15));
        assert_eq!(engine.state().formatted(), "00:15");

        // A skipped tick doesn't matter, only the wall clock does.
        assert!(!engine.tick(t0() + secs(24)));
        assert_eq!(engine.state().remaining(), Duration::from_secs(1));

        assert!(engine.tick(t0() + secs(30)));
        assert_eq!(engine.state().phase(), TimerPhase::WaitShortRest);
        assert_eq!(engine.state().remaining(), Duration::from_secs(5));
        assert_eq!(engine.state().started(), None);
        assert_eq!(engine.state().work_in_line(), 2);
    }

    #[test]
    fn engine_tick_ignored_when_not_running() {
        let (mut engine, _) = new_engine(settings(false, false));
        let state = engine.state().clone();
        assert!(!engine.tick(t0() + secs(3600)));
        assert_eq!(engine.state(), &state);
    }

    #[test]
    fn engine_tick_with_clock_before_start() {
        let (mut engine, _) = new_engine(settings(false, false));
        engine.start(t0());
        assert!(!engine.tick(t0() - secs(5)));
        assert_eq!(engine.state().remaining(), Duration::from_secs(25));
    }

    #[test]
    fn engine_cycle_ends_with_long_rest() {
        let (mut engine, _) = new_engine(settings(false, false));
        let mut now = t0();

        for round in 1..=4 {
            assert_eq!(engine.state().work_in_line(), round);
            engine.start(now);
            now += secs(25);
            assert!(engine.tick(now));

            let (wait, rest, length) = if round == 4 {
                (TimerPhase::WaitLongRest, TimerPhase::LongRest, 15)
            } else {
                (TimerPhase::WaitShortRest, TimerPhase::ShortRest, 5)
            };
            assert_eq!(engine.state().phase(), wait);

            engine.start(now);
            assert_eq!(engine.state().phase(), rest);
            assert_eq!(engine.state().duration(), Duration::from_secs(length));
            now += secs(length as i64);
            assert!(engine.tick(now));
            assert_eq!(engine.state().phase(), TimerPhase::WaitWork);
        }

        assert_eq!(engine.state().work_in_line(), 5);
    }

    #[test]
    fn engine_credits_finished_work() {
        let (mut engine, todos) = new_engine(settings(false, false));
        let task = todos.add("write".into(), "".into());
        engine.set_focus(task.clone());

        engine.start(t0());
        engine.tick(t0() + secs(12));
        assert!(engine.tick(t0() + secs(26)));

        let stored = todos.get(task.id()).unwrap();
        assert_eq!(
            stored.intervals(),
            &[Interval::new(Duration::from_secs(25), t0(), true)]
        );
        assert_eq!(engine.state().focus(), Some(&stored));
    }

    #[test]
    fn engine_credits_interrupted_work() {
        let (mut engine, todos) = new_engine(settings(false, false));
        let task = todos.add("write".into(), "".into());
        engine.set_focus(task.clone());

        engine.start(t0());
        engine.tick(t0() + secs(10));
        assert!(engine.stop());

        let stored = todos.get(task.id()).unwrap();
        assert_eq!(
            stored.intervals(),
            &[Interval::new(Duration::from_secs(25), t0(), false)]
        );
        let state = engine.state();
        assert_eq!(state.phase(), TimerPhase::WaitShortRest);
        assert_eq!(state.started(), None);
        assert_eq!(state.remaining(), Duration::from_secs(5));
        assert_eq!(state.work_in_line(), 1);
    }

    #[test]
    fn engine_stop_while_armed() {
        let (mut engine, _) = new_engine(settings(false, false));
        let state = engine.state().clone();
        assert!(!engine.stop());
        assert_eq!(engine.state(), &state);
    }

    #[test]
    fn engine_stop_during_rest() {
        let (mut engine, todos) = new_engine(settings(false, false));
        let task = todos.add("write".into(), "".into());
        engine.start(t0());
        engine.tick(t0() + secs(25));
        engine.set_focus(task.clone());
        engine.start(t0() + secs(30));
        assert_eq!(engine.state().phase(), TimerPhase::ShortRest);

        assert!(engine.stop());
        assert_eq!(engine.state().phase(), TimerPhase::WaitWork);
        assert_eq!(engine.state().remaining(), Duration::from_secs(25));
        assert!(todos.get(task.id()).unwrap().intervals().is_empty());
    }

    #[test]
    fn engine_survives_deleted_focus() {
        let (mut engine, todos) = new_engine(settings(false, false));
        let task = todos.add("gone".into(), "".into());
        engine.set_focus(task.clone());
        engine.start(t0());
        todos.delete(task.id());

        assert!(engine.tick(t0() + secs(25)));
        assert_eq!(engine.state().phase(), TimerPhase::WaitShortRest);
        assert_eq!(engine.state().focus(), None);
        assert_eq!(todos.get(task.id()), None);
    }

    #[test]
    fn engine_stop_survives_deleted_focus() {
        let (mut engine, todos) = new_engine(settings(false, false));
        let task = todos.add("gone".into(), "".into());
        engine.set_focus(task.clone());
        engine.start(t0());
        engine.tick(t0() + secs(10));
        todos.delete(task.id());

        assert!(engine.stop());
        assert_eq!(engine.state().phase(), TimerPhase::WaitShortRest);
        assert_eq!(engine.state().focus(), None);
        assert_eq!(engine.state().work_in_line(), 1);
        assert_eq!(todos.get(task.id()), None);
    }

    #[test]
    fn engine_on_done_accepts_unsync_state() {
        let (mut engine, _) = new_engine(settings(false, false));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let count = Cell::new(0);
        engine.on_done(Box::new(move |phase| {
            count.set(count.get() + 1);
            sink.lock().unwrap().push((phase, count.get()));
        }));

        engine.start(t0());
        engine.tick(t0() + secs(25));
        assert_eq!(*seen.lock().unwrap(), vec![(TimerPhase::Working, 1)]);
    }

    #[test]
    fn engine_on_done_replaces_callback() {
        let (mut engine, _) = new_engine(settings(false, false));
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&first);
        engine.on_done(Box::new(move |phase| sink.lock().unwrap().push(phase)));
        let sink = Arc::clone(&second);
        engine.on_done(Box::new(move |phase| sink.lock().unwrap().push(phase)));

        engine.start(t0());
        engine.tick(t0() + secs(25));
        engine.start(t0() + secs(25));
        engine.tick(t0() + secs(30));

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(
            *second.lock().unwrap(),
            vec![TimerPhase::Working, TimerPhase::ShortRest]
        );
    }

    #[test]
    fn engine_stop_does_not_trigger_callback() {
        let (mut engine, _) = new_engine(settings(false, false));
        let calls = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&calls);
        engine.on_done(Box::new(move |_| *sink.lock().unwrap() += 1));

        engine.start(t0());
        engine.stop();
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn engine_auto_starts_rest() {
        let (mut engine, _) = new_engine(settings(true, false));
        engine.start(t0());

        assert!(engine.tick(t0() + secs(27)));
        let state = engine.state();
        assert_eq!(state.phase(), TimerPhase::ShortRest);
        assert_eq!(state.started(), Some(t0() + secs(27)));
        assert_eq!(state.remaining(), Duration::from_secs(5));
        assert!(engine.is_running());

        assert!(engine.tick(t0() + secs(32)));
        assert_eq!(engine.state().phase(), TimerPhase::WaitWork);
        assert!(!engine.is_running());
    }

    #[test]
    fn engine_auto_starts_work() {
        let (mut engine, _) = new_engine(settings(false, true));
        engine.start(t0());
        engine.tick(t0() + secs(25));
        assert_eq!(engine.state().phase(), TimerPhase::WaitShortRest);

        engine.start(t0() + secs(25));
        assert!(engine.tick(t0() + secs(30)));
        assert_eq!(engine.state().phase(), TimerPhase::Working);
        assert_eq!(engine.state().started(), Some(t0() + secs(30)));
        assert_eq!(engine.state().work_in_line(), 2);
    }
}
