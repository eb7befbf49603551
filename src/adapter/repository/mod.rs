mod memory;
mod settings;

pub use memory::InMemoryTaskRepository;
pub use settings::SettingsConfiguration;
