use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::counter_party::CounterPartyIdentity;
use crate::domain::query::TransactionQuery;
use crate::domain::transaction::{NewTransaction, TransactionRecord};
use crate::ledger::{AddOutcome, CounterPartyRegistry, Ledger};
use crate::parser::ParsedTransaction;

/// Tally of what happened while merging a batch of parsed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub replaced: usize,
    pub unidentified: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: &AddOutcome) {
        match outcome {
            AddOutcome::Inserted => self.inserted += 1,
            AddOutcome::Duplicate => self.duplicates += 1,
            AddOutcome::Replaced(_) => self.replaced += 1,
            AddOutcome::Unidentified => self.unidentified += 1,
        }
    }
}

/// Owns the counter-party registry and the ledger for one run.
///
/// Independent runs use independent contexts; [`AppContext::reset`] brings
/// an existing one back to its freshly constructed state.
#[derive(Debug, Default)]
pub struct AppContext {
    registry: CounterPartyRegistry,
    ledger: Ledger,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            registry: CounterPartyRegistry::new(),
            ledger: Ledger::new(),
        }
    }

    /// Fresh context with the configured counter parties pre-registered.
    pub fn with_config(config: &Config) -> Self {
        let context = Self::new();
        config.apply(&context.registry);
        context
    }

    pub fn registry(&self) -> &CounterPartyRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn add_transaction(&mut self, draft: NewTransaction) -> AddOutcome {
        self.ledger.add_transaction(draft, &self.registry)
    }

    pub fn ingest<I>(&mut self, parsed: I) -> IngestSummary
    where
        I: IntoIterator<Item = ParsedTransaction>,
    {
        let mut summary = IngestSummary::default();
        for transaction in parsed {
            let outcome = self.add_transaction(transaction.into_new_transaction());
            summary.record(&outcome);
        }
        tracing::debug!(?summary, "ingested parsed transactions");
        summary
    }

    pub fn transactions(&self, query: &TransactionQuery) -> Vec<&TransactionRecord> {
        self.ledger.transactions(query, &self.registry)
    }

    pub fn total_liquidity_change(&self, query: &TransactionQuery) -> i64 {
        self.ledger.total_liquidity_change(query, &self.registry)
    }

    pub fn total_capital_change(&self, query: &TransactionQuery) -> i64 {
        self.ledger.total_capital_change(query, &self.registry)
    }

    pub fn total_net_change(&self, query: &TransactionQuery) -> i64 {
        self.ledger.total_net_change(query, &self.registry)
    }

    pub fn identities(&self) -> Vec<Arc<CounterPartyIdentity>> {
        self.registry.identities()
    }

    pub fn counter_party_names(&self) -> BTreeSet<String> {
        self.registry.names()
    }

    pub fn aliases(&self) -> BTreeSet<String> {
        self.registry.aliases()
    }

    pub fn reset(&mut self) {
        self.ledger.reset();
        self.registry.reset();
    }
}
