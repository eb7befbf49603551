pub mod settings;
pub mod task;

pub use settings::{GetSettingsError, SettingsRepository};
pub use task::{TaskRepository, TaskRepositoryExt};
