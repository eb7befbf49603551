use std::num::NonZeroU32;

use snafu::prelude::*;

use crate::domain::entity::duration::PhaseDuration;
use crate::domain::entity::phase::PhaseKind;

const DEFAULT_WORK_SECONDS: u64 = 25 * 60;
const DEFAULT_SHORT_REST_SECONDS: u64 = 5 * 60;
const DEFAULT_LONG_REST_SECONDS: u64 = 15 * 60;
const DEFAULT_SEQUENCE_LENGTH: NonZeroU32 = match NonZeroU32::new(4) {
    Some(value) => value,
    None => unreachable!(),
};

/// Configuration of the timer, fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub work_duration: PhaseDuration,
    pub short_rest_duration: PhaseDuration,
    pub long_rest_duration: PhaseDuration,
    pub cycle: CycleSettings,
}

impl TimerSettings {
    /// Get the duration corresponding to a kind of phase.
    pub fn duration(&self, kind: PhaseKind) -> PhaseDuration {
        match kind {
            PhaseKind::Work => self.work_duration,
            PhaseKind::ShortRest => self.short_rest_duration,
            PhaseKind::LongRest => self.long_rest_duration,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        let duration = |seconds| match PhaseDuration::try_new(seconds) {
            Ok(duration) => duration,
            Err(_) => unreachable!("default durations are non-zero"),
        };

        Self {
            work_duration: duration(DEFAULT_WORK_SECONDS),
            short_rest_duration: duration(DEFAULT_SHORT_REST_SECONDS),
            long_rest_duration: duration(DEFAULT_LONG_REST_SECONDS),
            cycle: CycleSettings::default(),
        }
    }
}

/// How work and rest phases chain into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSettings {
    sequence_length: NonZeroU32,
    /// Start a rest right after a work phase finishes.
    pub auto_start_rest: bool,
    /// Start working right after a rest finishes.
    pub auto_start_work: bool,
}

impl CycleSettings {
    /// Try to create a [`CycleSettings`].
    ///
    /// # Errors
    ///
    /// This function will return an error if `sequence_length` is zero.
    pub fn try_new(
        sequence_length: u32,
        auto_start_rest: bool,
        auto_start_work: bool,
    ) -> Result<Self, TryNewCycleSettingsError> {
        let sequence_length = NonZeroU32::new(sequence_length).context(ZeroSequenceSnafu)?;
        Ok(Self {
            sequence_length,
            auto_start_rest,
            auto_start_work,
        })
    }

    /// Number of work phases in one cycle. The last one is followed by a
    /// long rest.
    pub fn sequence_length(&self) -> NonZeroU32 {
        self.sequence_length
    }
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            auto_start_rest: true,
            auto_start_work: false,
        }
    }
}

/// An error type of creating a [`CycleSettings`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum TryNewCycleSettingsError {
    #[snafu(display("Sequence length must be greater than zero"))]
    #[non_exhaustive]
    ZeroSequence,
}
