use std::sync::Arc;

use snafu::prelude::*;

use crate::adapter::config::Configuration;
use crate::domain::entity::{CycleSettings, PhaseDuration, PhaseKind};
use crate::domain::repository::settings::{InvalidCycleSnafu, InvalidDurationSnafu};
use crate::domain::repository::{GetSettingsError, SettingsRepository};

/// A [`SettingsRepository`] implementation which reads configuration files.
pub struct SettingsConfiguration {
    config: Arc<Configuration>,
}

impl SettingsConfiguration {
    /// Creates a new [`SettingsConfiguration`].
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl SettingsRepository for SettingsConfiguration {
    async fn phase_duration(&self, kind: PhaseKind) -> Result<PhaseDuration, GetSettingsError> {
        let section = &self.config.duration;
        let raw = match kind {
            PhaseKind::Work => section.work,
            PhaseKind::ShortRest => section.short_rest,
            PhaseKind::LongRest => section.long_rest,
        };
        PhaseDuration::try_new(raw).context(InvalidDurationSnafu)
    }

    async fn cycle(&self) -> Result<CycleSettings, GetSettingsError> {
        let section = &self.config.cycle;
        CycleSettings::try_new(
            section.sequence_length,
            section.auto_start_rest,
            section.auto_start_work,
        )
        .context(InvalidCycleSnafu)
    }
}
