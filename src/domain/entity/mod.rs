pub mod duration;
pub mod phase;
pub mod settings;
pub mod task;

pub use duration::{format_clock, PhaseDuration};
pub use phase::{PhaseKind, TimerPhase};
pub use settings::{CycleSettings, TimerSettings};
pub use task::{Interval, Task, TaskId};
