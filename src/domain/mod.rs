pub mod app;
pub mod entity;
pub mod inbound;
pub mod repository;
pub mod timer;
pub mod todo;

pub use app::{ApplicationCore, SetupApplicationCoreError};
