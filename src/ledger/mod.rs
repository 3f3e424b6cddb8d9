//! Transaction store and the counter-party registry it resolves against.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod registry;

pub use ledger::{AddOutcome, Ledger};
pub use registry::CounterPartyRegistry;
