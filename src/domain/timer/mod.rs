pub mod clock;
pub mod engine;
pub mod worker;

pub use clock::{Clock, SystemClock};
pub use engine::{DoneCallback, FinishWorkingError, TimerEngine, TimerState};
pub use worker::{SpawnWorkerError, WorkerError, WorkerHandle};
