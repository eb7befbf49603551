use std::time::Duration;

use snafu::prelude::*;

/// The duration of one timer phase, represented in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PhaseDuration(Duration);

impl PhaseDuration {
    /// Try to create a [`PhaseDuration`] from a number of seconds.
    ///
    /// # Errors
    ///
    /// This function will return an error if the integer is zero.
    pub fn try_new(seconds: u64) -> Result<Self, TryNewPhaseDurationError> {
        ensure!(seconds > 0, ZeroSnafu);
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Returns the inner [`Duration`] of this [`PhaseDuration`].
    pub fn inner(&self) -> Duration {
        self.0
    }
}

impl TryFrom<u64> for PhaseDuration {
    type Error = TryNewPhaseDurationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<PhaseDuration> for Duration {
    fn from(value: PhaseDuration) -> Self {
        value.0
    }
}

/// An error type of creating a [`PhaseDuration`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum TryNewPhaseDurationError {
    #[snafu(display("Duration must be greater than zero"))]
    #[non_exhaustive]
    Zero,
}

/// Render a duration as `MM:SS`. Minutes are not wrapped into hours and
/// fractional seconds are truncated.
pub fn format_clock(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_duration_try_new() {
        assert_eq!(
            PhaseDuration::try_new(10),
            Ok(PhaseDuration(Duration::from_secs(10))),
        );
        assert_eq!(
            PhaseDuration::try_new(0),
            Err(TryNewPhaseDurationError::Zero),
        );
    }

    #[test]
    fn phase_duration_try_from() {
        assert_eq!(10.try_into(), Ok(PhaseDuration(Duration::from_secs(10))));
        assert_eq!(
            0.try_into(),
            Err::<PhaseDuration, TryNewPhaseDurationError>(TryNewPhaseDurationError::Zero)
        );
    }

    #[test]
    fn format_clock_pads_both_components() {
        assert_eq!(format_clock(Duration::from_secs(65)), "01:05");
        assert_eq!(format_clock(Duration::from_secs(9)), "00:09");
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_clock(Duration::from_secs(25 * 60)), "25:00");
        assert_eq!(format_clock(Duration::from_secs(65 * 60 + 1)), "65:01");
    }
}
