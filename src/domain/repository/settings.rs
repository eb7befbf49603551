use std::error::Error as StdError;

use snafu::prelude::*;

use crate::domain::entity::duration::{PhaseDuration, TryNewPhaseDurationError};
use crate::domain::entity::settings::{CycleSettings, TryNewCycleSettingsError};
use crate::domain::entity::PhaseKind;

/// An abstract interface for accessing timer settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SettingsRepository: Send + Sync + 'static {
    /// Get the duration of one kind of phase.
    ///
    /// # Errors
    ///
    /// This function will return an error if failed to get the duration.
    async fn phase_duration(&self, kind: PhaseKind) -> Result<PhaseDuration, GetSettingsError>;

    /// Get how work and rest phases chain into each other.
    ///
    /// # Errors
    ///
    /// This function will return an error if failed to get the settings.
    async fn cycle(&self) -> Result<CycleSettings, GetSettingsError>;
}

/// An error type of accessing the repository of timer settings.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum GetSettingsError {
    #[snafu(display("Could not create an invalid duration"))]
    #[non_exhaustive]
    InvalidDuration { source: TryNewPhaseDurationError },
    #[snafu(display("Could not create an invalid cycle"))]
    #[non_exhaustive]
    InvalidCycle { source: TryNewCycleSettingsError },
    #[snafu(whatever, display("Load settings failed: {message}"))]
    #[non_exhaustive]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError>, Some)))]
        source: Option<Box<dyn StdError>>,
    },
}
