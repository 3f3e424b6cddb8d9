//! Counter-party definitions and report preferences loaded before parsing.

pub mod manager;
pub mod model;

pub use manager::ConfigManager;
pub use model::{Config, CounterPartyDefinition, ReportOptions};
