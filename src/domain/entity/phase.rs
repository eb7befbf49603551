use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroU32;

use serde::Serialize;

/// One segment of the tomato clock cycle. Every kind of segment has an armed
/// variant, waiting for an explicit start, and an active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerPhase {
    WaitWork,
    Working,
    WaitShortRest,
    ShortRest,
    WaitLongRest,
    LongRest,
}

/// The kind of a [`TimerPhase`], which decides its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Work,
    ShortRest,
    LongRest,
}

impl TimerPhase {
    /// Get an initialized [`TimerPhase`].
    pub fn initial() -> Self {
        Self::WaitWork
    }

    /// Get the next [`TimerPhase`] based on the current one.
    ///
    /// `work_in_line` is the position of the current work phase in the cycle,
    /// starting from 1. Every `sequence_length`-th work phase is followed by a
    /// long rest.
    pub fn next(self, work_in_line: u32, sequence_length: NonZeroU32) -> Self {
        match self {
            Self::WaitWork => Self::Working,
            Self::Working if work_in_line % sequence_length.get() == 0 => Self::WaitLongRest,
            Self::Working => Self::WaitShortRest,
            Self::WaitShortRest => Self::ShortRest,
            Self::WaitLongRest => Self::LongRest,
            Self::ShortRest | Self::LongRest => Self::WaitWork,
        }
    }

    /// Returns `true` if the timer runs in this phase.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Working | Self::ShortRest | Self::LongRest)
    }

    /// Returns the [`PhaseKind`] of this phase.
    pub fn kind(self) -> PhaseKind {
        match self {
            Self::WaitWork | Self::Working => PhaseKind::Work,
            Self::WaitShortRest | Self::ShortRest => PhaseKind::ShortRest,
            Self::WaitLongRest | Self::LongRest => PhaseKind::LongRest,
        }
    }
}

impl Display for TimerPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::WaitWork => f.write_str("Ready to work"),
            Self::Working => f.write_str("Working"),
            Self::WaitShortRest => f.write_str("Ready for a short rest"),
            Self::ShortRest => f.write_str("Short rest"),
            Self::WaitLongRest => f.write_str("Ready for a long rest"),
            Self::LongRest => f.write_str("Long rest"),
        }
    }
}

impl Display for PhaseKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Work => f.write_str("work"),
            Self::ShortRest => f.write_str("short rest"),
            Self::LongRest => f.write_str("long rest"),
        }
    }
}
