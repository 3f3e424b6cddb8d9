pub mod context;
pub mod services;
pub mod utils;

pub use context::{AppContext, IngestSummary};
