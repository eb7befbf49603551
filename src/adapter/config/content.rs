use serde::Deserialize;

/// Parsed content of the configuration file. Missing keys fall back to their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub duration: DurationContent,
    pub cycle: CycleContent,
}

/// Duration of each kind of phase, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationContent {
    pub work: u64,
    pub short_rest: u64,
    pub long_rest: u64,
}

impl Default for DurationContent {
    fn default() -> Self {
        Self {
            work: 1500,
            short_rest: 300,
            long_rest: 900,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleContent {
    pub sequence_length: u32,
    pub auto_start_rest: bool,
    pub auto_start_work: bool,
}

impl Default for CycleContent {
    fn default() -> Self {
        Self {
            sequence_length: 4,
            auto_start_rest: true,
            auto_start_work: false,
        }
    }
}
