#![doc(test(attr(deny(warnings))))]

//! Spendlog turns bank statement exports into a deduplicated ledger of
//! fingerprinted transactions, attributes each one to a known counter party,
//! and summarises spending by tag, category and counter party.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod parser;
pub mod utils;

pub use crate::core::AppContext;
pub use domain::{
    CounterPartyIdentity, Fingerprint, NewTransaction, Reconciliation, TimeRange,
    TransactionModifier, TransactionQuery, TransactionRecord,
};
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{AddOutcome, CounterPartyRegistry, Ledger};

/// Initializes global tracing at the default verbosity.
pub fn init() {
    init_with_verbosity(0);
}

/// Initializes global tracing; later calls are no-ops.
pub fn init_with_verbosity(verbosity: u8) {
    utils::init_tracing(verbosity);
}
