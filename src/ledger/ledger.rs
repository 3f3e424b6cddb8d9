use indexmap::IndexMap;

use crate::domain::common::Displayable;
use crate::domain::query::TransactionQuery;
use crate::domain::transaction::{Fingerprint, NewTransaction, Reconciliation, TransactionRecord};
use crate::errors::ReconciliationConflict;

use super::registry::CounterPartyRegistry;

/// What happened to a record handed to [`Ledger::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// Same fingerprint and content as a stored record; nothing changed.
    Duplicate,
    /// Same fingerprint, different content; the stored record was replaced.
    Replaced(ReconciliationConflict),
    /// No fingerprint; stored without deduplication.
    Unidentified,
}

/// Identity-reconciling transaction store.
///
/// At most one record per fingerprint is kept; a conflicting insert
/// replaces the stored record. Records without a fingerprint are always
/// kept. Mutation goes through `&mut self`, so the membership check and the
/// replacement happen as one step.
#[derive(Debug, Default)]
pub struct Ledger {
    identified: IndexMap<Fingerprint, TransactionRecord>,
    unidentified: Vec<TransactionRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        tracing::debug!("initializing new ledger");
        Self::default()
    }

    /// Creates a record from `draft` and merges it. Never fails; conflicts
    /// are logged and recovered by last-write-wins.
    pub fn add_transaction(
        &mut self,
        draft: NewTransaction,
        registry: &CounterPartyRegistry,
    ) -> AddOutcome {
        let record = TransactionRecord::create(draft, registry);
        self.insert(record)
    }

    pub fn insert(&mut self, record: TransactionRecord) -> AddOutcome {
        let Some(fingerprint) = record.fingerprint().cloned() else {
            self.unidentified.push(record);
            return AddOutcome::Unidentified;
        };

        let reconciliation = match self.identified.get(&fingerprint) {
            Some(existing) => existing.reconcile(&record),
            None => {
                tracing::info!(record = %record.display_label(), "adding transaction");
                self.identified.insert(fingerprint, record);
                return AddOutcome::Inserted;
            }
        };

        match reconciliation {
            Reconciliation::Same => {
                tracing::warn!(fingerprint = fingerprint.short(), "transaction already exists");
                AddOutcome::Duplicate
            }
            Reconciliation::Conflict(conflict) => {
                tracing::error!("{conflict}. Replacing old transaction with new to recover.");
                self.identified.shift_remove(&fingerprint);
                self.identified.insert(fingerprint, record);
                AddOutcome::Replaced(conflict)
            }
            // Both records carry the map key, so `reconcile` can only see
            // matching fingerprints here.
            Reconciliation::Different => {
                self.identified.insert(fingerprint, record);
                AddOutcome::Inserted
            }
        }
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&TransactionRecord> {
        self.identified.get(fingerprint)
    }

    /// Every stored record, identified ones first in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &TransactionRecord> {
        tracing::trace!("ledger records requested");
        self.identified.values().chain(self.unidentified.iter())
    }

    pub fn len(&self) -> usize {
        self.identified.len() + self.unidentified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reset(&mut self) {
        self.identified.clear();
        self.unidentified.clear();
        tracing::debug!("reset ledger");
    }

    pub fn transactions(
        &self,
        query: &TransactionQuery,
        registry: &CounterPartyRegistry,
    ) -> Vec<&TransactionRecord> {
        query.filter(self.records(), registry)
    }

    pub fn total_liquidity_change(
        &self,
        query: &TransactionQuery,
        registry: &CounterPartyRegistry,
    ) -> i64 {
        self.transactions(query, registry)
            .iter()
            .map(|record| record.liquidity_change())
            .sum()
    }

    pub fn total_capital_change(
        &self,
        query: &TransactionQuery,
        registry: &CounterPartyRegistry,
    ) -> i64 {
        self.transactions(query, registry)
            .iter()
            .map(|record| record.capital_change())
            .sum()
    }

    pub fn total_net_change(
        &self,
        query: &TransactionQuery,
        registry: &CounterPartyRegistry,
    ) -> i64 {
        self.transactions(query, registry)
            .iter()
            .map(|record| record.net_change())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::{tags, Tags};
    use crate::domain::transaction::RecordField;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn booze() -> NewTransaction {
        NewTransaction::new()
            .liquidity_change(1)
            .capital_change(2)
            .counter_party("alias")
            .tags(Tags::new())
            .category("booze")
            .date(at(2025, 1, 24))
    }

    #[test]
    fn duplicate_adds_are_ignored() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_transaction(booze().fingerprint("f"), &registry), AddOutcome::Inserted);
        assert_eq!(ledger.add_transaction(booze().fingerprint("f"), &registry), AddOutcome::Duplicate);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&Fingerprint::new("f")).unwrap().counter_party_alias(), "alias");
    }

    #[test]
    fn conflicting_add_replaces_the_stored_record() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        ledger.add_transaction(booze().fingerprint("f"), &registry);

        let outcome = ledger.add_transaction(booze().counter_party("new alias").fingerprint("f"), &registry);
        let AddOutcome::Replaced(conflict) = outcome else {
            panic!("expected replacement, got {outcome:?}");
        };
        assert_eq!(conflict.mismatches[0].field, RecordField::CounterPartyAlias);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&Fingerprint::new("f")).unwrap().counter_party_alias(), "new alias");
    }

    #[test]
    fn differing_tag_sets_replace_the_stored_record() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        ledger.add_transaction(booze().tags(tags(["a, b"])).fingerprint("f"), &registry);

        let outcome = ledger.add_transaction(booze().tags(tags(["a", "b"])).fingerprint("f"), &registry);
        let AddOutcome::Replaced(conflict) = outcome else {
            panic!("expected replacement, got {outcome:?}");
        };
        assert_eq!(conflict.mismatches[0].field, RecordField::Tags);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&Fingerprint::new("f")).unwrap().tags(), &tags(["a", "b"]));

        let again = ledger.add_transaction(booze().tags(tags(["a", "b"])).fingerprint("f"), &registry);
        assert_eq!(again, AddOutcome::Duplicate);
    }

    #[test]
    fn same_fingerprint_never_inserts_a_second_record() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        ledger.add_transaction(booze().fingerprint("f"), &registry);
        for variant in [booze(), booze().liquidity_change(7), booze().category("food")] {
            let outcome = ledger.add_transaction(variant.fingerprint("f"), &registry);
            assert_ne!(outcome, AddOutcome::Inserted);
        }
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn distinct_fingerprints_are_kept_apart() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        ledger.add_transaction(booze().fingerprint("f1"), &registry);
        ledger.add_transaction(booze().fingerprint("f2"), &registry);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn unidentified_records_are_never_deduplicated() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_transaction(booze(), &registry), AddOutcome::Unidentified);
        assert_eq!(ledger.add_transaction(booze(), &registry), AddOutcome::Unidentified);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn reset_empties_the_ledger() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        ledger.add_transaction(booze().fingerprint("f1"), &registry);
        ledger.add_transaction(booze(), &registry);
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.add_transaction(booze().fingerprint("f1"), &registry), AddOutcome::Inserted);
    }

    #[test]
    fn totals_sum_selected_records() {
        let registry = CounterPartyRegistry::new();
        let mut ledger = Ledger::new();
        let rows = [
            (123, 89, "2025-01-24", ["tag 1", "tag 2"]),
            (572, 432, "2025-01-14", ["tag 2", "tag 3"]),
            (53, 6545, "2025-03-14", ["tag 3", "tag 4"]),
        ];
        for (idx, (liquidity, capital, date, row_tags)) in rows.iter().enumerate() {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            ledger.add_transaction(
                NewTransaction::new()
                    .liquidity_change(*liquidity)
                    .capital_change(*capital)
                    .counter_party(format!("alias{idx}"))
                    .tags(tags(row_tags.iter().copied()))
                    .category("booze")
                    .date(date)
                    .fingerprint(format!("fp{idx}")),
                &registry,
            );
        }

        let all = TransactionQuery::new();
        assert_eq!(ledger.total_liquidity_change(&all, &registry), 748);
        assert_eq!(ledger.total_capital_change(&all, &registry), 7066);
        assert_eq!(ledger.total_net_change(&all, &registry), 7814);

        let tagged = TransactionQuery::new().with_tags(tags(["tag 3"]));
        assert_eq!(ledger.total_liquidity_change(&tagged, &registry), 625);

        let nothing = TransactionQuery::new().with_category("rent");
        assert_eq!(ledger.total_net_change(&nothing, &registry), 0);
    }
}
