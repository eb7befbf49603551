mod service;

pub use service::{SwitchTaskError, TaskFilter, TodoService};
