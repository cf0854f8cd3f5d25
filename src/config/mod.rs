//! Configuration and CLI handling

pub mod cli;
pub mod settings;

pub use cli::{Algorithm, Cli};
pub use settings::Settings;
