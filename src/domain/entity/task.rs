use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identity of a [`Task`], allocated by the task repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a new [`TaskId`].
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value of this [`TaskId`].
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// One work session credited to a task, finished or abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    duration: Duration,
    start: DateTime<Utc>,
    is_done: bool,
}

impl Interval {
    /// Creates a new [`Interval`].
    pub fn new(duration: Duration, start: DateTime<Utc>, is_done: bool) -> Self {
        Self {
            duration,
            start,
            is_done,
        }
    }

    /// Returns the intended duration of the session.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the moment the session started.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns `true` if the session ran until its natural end.
    pub fn is_done(&self) -> bool {
        self.is_done
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    done: bool,
    intervals: Vec<Interval>,
}

impl Task {
    /// Creates a new pending [`Task`] without any interval.
    pub fn new(id: TaskId, title: String, description: String) -> Self {
        Self {
            id,
            title,
            description,
            done: false,
            intervals: Vec::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Returns the recorded intervals in the order they were appended.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of intervals that ran until their natural end.
    pub fn finished_intervals(&self) -> usize {
        self.intervals.iter().filter(|i| i.is_done()).count()
    }

    /// Returns this [`Task`] with its completion flag set to `done`.
    pub fn with_done(self, done: bool) -> Self {
        Self { done, ..self }
    }

    /// Returns this [`Task`] with `interval` appended.
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }
}
