//! Multi-predicate selection over ledger records.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::common::Tags;
use crate::domain::counter_party::CounterPartyIdentity;
use crate::domain::transaction::TransactionRecord;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::registry::CounterPartyRegistry;

/// Inclusive date-time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> LedgerResult<Self> {
        if end < start {
            return Err(LedgerError::InvalidInput(
                "time range end must not precede its start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Covers whole days, from the start of `first` to the last second of `last`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate) -> LedgerResult<Self> {
        let start = first
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| LedgerError::InvalidInput(format!("invalid start date {first}")))?;
        let end = last
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| LedgerError::InvalidInput(format!("invalid end date {last}")))?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Ten independent predicates; an unset predicate matches every record.
/// A record is selected when it satisfies all set predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub time_range: Option<TimeRange>,
    pub required_category: Option<String>,
    pub forbidden_category: Option<String>,
    pub allowed_categories: Option<BTreeSet<String>>,
    /// Record tags must include all of these.
    pub required_tags: Option<Tags>,
    /// Record tags must include none of these.
    pub forbidden_tags: Option<Tags>,
    /// Every record tag must be one of these.
    pub allowed_tags: Option<Tags>,
    pub required_counter_party: Option<String>,
    pub forbidden_counter_party: Option<String>,
    pub allowed_counter_parties: Option<BTreeSet<String>>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.required_category = Some(category.into());
        self
    }

    pub fn without_category(mut self, category: impl Into<String>) -> Self {
        self.forbidden_category = Some(category.into());
        self
    }

    pub fn in_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.required_tags = Some(tags);
        self
    }

    pub fn without_tags(mut self, tags: Tags) -> Self {
        self.forbidden_tags = Some(tags);
        self
    }

    pub fn allowing_tags(mut self, tags: Tags) -> Self {
        self.allowed_tags = Some(tags);
        self
    }

    pub fn with_counter_party(mut self, alias: impl Into<String>) -> Self {
        self.required_counter_party = Some(alias.into());
        self
    }

    pub fn without_counter_party(mut self, alias: impl Into<String>) -> Self {
        self.forbidden_counter_party = Some(alias.into());
        self
    }

    pub fn in_counter_parties<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_counter_parties = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    /// Keeps the records that satisfy every set predicate, preserving order.
    ///
    /// Counter-party predicates compare resolved identities, so any alias of
    /// an identity selects the records of all its aliases.
    pub fn filter<'a, I>(
        &self,
        records: I,
        registry: &CounterPartyRegistry,
    ) -> Vec<&'a TransactionRecord>
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let resolved = ResolvedParties::resolve(self, registry);
        let selected: Vec<&TransactionRecord> = records
            .into_iter()
            .filter(|record| self.matches_fields(record) && resolved.matches(record, registry))
            .collect();
        tracing::trace!(selected = selected.len(), "evaluated transaction query");
        selected
    }

    /// Evaluates a single record against every predicate.
    pub fn matches(&self, record: &TransactionRecord, registry: &CounterPartyRegistry) -> bool {
        self.matches_fields(record)
            && ResolvedParties::resolve(self, registry).matches(record, registry)
    }

    fn matches_fields(&self, record: &TransactionRecord) -> bool {
        if let Some(range) = &self.time_range {
            if !range.contains(record.date()) {
                return false;
            }
        }
        if let Some(category) = &self.required_category {
            if record.category() != category {
                return false;
            }
        }
        if let Some(category) = &self.forbidden_category {
            if record.category() == category {
                return false;
            }
        }
        if let Some(categories) = &self.allowed_categories {
            if !categories.contains(record.category()) {
                return false;
            }
        }
        if let Some(required) = &self.required_tags {
            if !required.is_subset(record.tags()) {
                return false;
            }
        }
        if let Some(forbidden) = &self.forbidden_tags {
            if !forbidden.is_disjoint(record.tags()) {
                return false;
            }
        }
        if let Some(allowed) = &self.allowed_tags {
            if !record.tags().is_subset(allowed) {
                return false;
            }
        }
        true
    }
}

/// Counter-party predicates with their aliases resolved once per query.
struct ResolvedParties {
    required: Option<Arc<CounterPartyIdentity>>,
    forbidden: Option<Arc<CounterPartyIdentity>>,
    allowed: Option<Vec<Arc<CounterPartyIdentity>>>,
}

impl ResolvedParties {
    fn resolve(query: &TransactionQuery, registry: &CounterPartyRegistry) -> Self {
        Self {
            required: query
                .required_counter_party
                .as_deref()
                .map(|alias| registry.resolve(alias)),
            forbidden: query
                .forbidden_counter_party
                .as_deref()
                .map(|alias| registry.resolve(alias)),
            allowed: query.allowed_counter_parties.as_ref().map(|aliases| {
                aliases.iter().map(|alias| registry.resolve(alias)).collect()
            }),
        }
    }

    fn is_empty(&self) -> bool {
        self.required.is_none() && self.forbidden.is_none() && self.allowed.is_none()
    }

    fn matches(&self, record: &TransactionRecord, registry: &CounterPartyRegistry) -> bool {
        if self.is_empty() {
            return true;
        }
        let identity = registry.resolve(record.counter_party_alias());
        if let Some(required) = &self.required {
            if identity.as_ref() != required.as_ref() {
                return false;
            }
        }
        if let Some(forbidden) = &self.forbidden {
            if identity.as_ref() == forbidden.as_ref() {
                return false;
            }
        }
        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|party| party.as_ref() == identity.as_ref()) {
                return false;
            }
        }
        true
    }
}
