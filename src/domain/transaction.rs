//! Ledger lines and their fingerprint-based identity contract.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::common::{format_tags, Displayable, Tags};
use crate::domain::counter_party::CounterPartyIdentity;
use crate::errors::ReconciliationConflict;
use crate::ledger::registry::CounterPartyRegistry;

pub const UNCATEGORIZED: &str = "uncategorized";

/// Deterministic identity token derived from a record's raw source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Hex encoded SHA-256 of the lines joined by `\n`.
    pub fn of_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                hasher.update(b"\n");
            }
            hasher.update(line.as_ref().as_bytes());
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the token, for log lines.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(12)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Record fields compared during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordField {
    LiquidityChange,
    CapitalChange,
    CounterPartyAlias,
    Date,
    Tags,
    Category,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordField::LiquidityChange => "liquidity change",
            RecordField::CapitalChange => "capital change",
            RecordField::CounterPartyAlias => "counter party alias",
            RecordField::Date => "date",
            RecordField::Tags => "tags",
            RecordField::Category => "category",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: RecordField,
    pub existing: String,
    pub incoming: String,
}

/// Outcome of comparing two records by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Same fingerprint, same content.
    Same,
    /// Same fingerprint, diverging content.
    Conflict(ReconciliationConflict),
    /// Different fingerprints, or at least one record is unidentified.
    Different,
}

/// Raw field values for a transaction about to be recorded.
///
/// Unset fields fall back to defaults, some of them taken from the resolved
/// counter party, when the record is created.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub liquidity_change: Option<i64>,
    pub capital_change: Option<i64>,
    pub counter_party_alias: Option<String>,
    pub tags: Option<Tags>,
    pub category: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub fingerprint: Option<Fingerprint>,
}

impl NewTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn liquidity_change(mut self, amount: i64) -> Self {
        self.liquidity_change = Some(amount);
        self
    }

    pub fn capital_change(mut self, amount: i64) -> Self {
        self.capital_change = Some(amount);
        self
    }

    pub fn counter_party(mut self, alias: impl Into<String>) -> Self {
        self.counter_party_alias = Some(alias.into());
        self
    }

    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn fingerprint(mut self, fingerprint: impl Into<Fingerprint>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }
}

/// One ledger line.
///
/// The counter party is kept as the alias string so later edits to the
/// identity never rewrite historical records. Tags and category are copied
/// from the identity at creation time when not given explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    liquidity_change: i64,
    capital_change: i64,
    counter_party_alias: String,
    tags: Tags,
    category: String,
    date: NaiveDateTime,
    fingerprint: Option<Fingerprint>,
}

impl TransactionRecord {
    /// Builds a record, resolving its counter party through `registry`.
    pub fn create(draft: NewTransaction, registry: &CounterPartyRegistry) -> Self {
        let alias = draft.counter_party_alias.clone().unwrap_or_default();
        let identity = registry.resolve(&alias);
        Self::with_identity(draft, &identity)
    }

    /// Builds a record against an already resolved identity.
    pub fn with_identity(draft: NewTransaction, identity: &CounterPartyIdentity) -> Self {
        let category = draft
            .category
            .or_else(|| identity.category().map(str::to_string))
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        let mut record = Self {
            liquidity_change: draft.liquidity_change.unwrap_or(0),
            capital_change: draft.capital_change.unwrap_or(0),
            counter_party_alias: draft.counter_party_alias.unwrap_or_default(),
            tags: draft.tags.unwrap_or_else(|| identity.tags().clone()),
            category,
            date: draft.date.unwrap_or_else(|| Local::now().naive_local()),
            fingerprint: draft.fingerprint,
        };

        identity.apply_modifier(&mut record);

        if record.fingerprint.is_none() {
            tracing::warn!(
                counter_party = %record.counter_party_alias,
                "instantiating transaction without fingerprint; it will never be deduplicated"
            );
        }
        tracing::debug!(record = %record.display_label(), "created transaction record");
        record
    }

    pub fn liquidity_change(&self) -> i64 {
        self.liquidity_change
    }

    pub fn capital_change(&self) -> i64 {
        self.capital_change
    }

    pub fn net_change(&self) -> i64 {
        self.liquidity_change + self.capital_change
    }

    pub fn counter_party_alias(&self) -> &str {
        &self.counter_party_alias
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn is_identified(&self) -> bool {
        self.fingerprint.is_some()
    }

    // Setters are for manual correction and never re-run the counter party modifier.

    pub fn set_liquidity_change(&mut self, amount: i64) {
        self.liquidity_change = amount;
    }

    pub fn set_capital_change(&mut self, amount: i64) {
        self.capital_change = amount;
    }

    pub fn set_counter_party_alias(&mut self, alias: impl Into<String>) {
        self.counter_party_alias = alias.into();
    }

    pub fn set_tags(&mut self, tags: Tags) {
        self.tags = tags;
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn set_date(&mut self, date: NaiveDateTime) {
        self.date = date;
    }

    /// Compares two records by fingerprint, then by content.
    pub fn reconcile(&self, other: &Self) -> Reconciliation {
        let (Some(ours), Some(theirs)) = (&self.fingerprint, &other.fingerprint) else {
            return Reconciliation::Different;
        };
        if ours != theirs {
            return Reconciliation::Different;
        }
        let mismatches = self.field_mismatches(other);
        if mismatches.is_empty() {
            Reconciliation::Same
        } else {
            Reconciliation::Conflict(ReconciliationConflict {
                fingerprint: ours.clone(),
                mismatches,
            })
        }
    }

    /// Identity comparison that surfaces a fingerprint collision as an error
    /// instead of answering `false`.
    pub fn identity_eq(&self, other: &Self) -> Result<bool, ReconciliationConflict> {
        match self.reconcile(other) {
            Reconciliation::Same => Ok(true),
            Reconciliation::Different => Ok(false),
            Reconciliation::Conflict(conflict) => Err(conflict),
        }
    }

    fn field_mismatches(&self, other: &Self) -> Vec<FieldMismatch> {
        let mut mismatches = Vec::new();
        let mut check = |differs: bool, field: RecordField, render: &dyn Fn(&Self) -> String| {
            if differs {
                mismatches.push(FieldMismatch {
                    field,
                    existing: render(self),
                    incoming: render(other),
                });
            }
        };
        check(
            self.liquidity_change != other.liquidity_change,
            RecordField::LiquidityChange,
            &|r| r.liquidity_change.to_string(),
        );
        check(
            self.capital_change != other.capital_change,
            RecordField::CapitalChange,
            &|r| r.capital_change.to_string(),
        );
        check(
            self.counter_party_alias != other.counter_party_alias,
            RecordField::CounterPartyAlias,
            &|r| r.counter_party_alias.clone(),
        );
        check(self.date != other.date, RecordField::Date, &|r| r.date.to_string());
        // sets, not their rendering: `{"a, b"}` and `{"a", "b"}` print alike
        check(self.tags != other.tags, RecordField::Tags, &|r| format!("{:?}", r.tags));
        check(
            self.category != other.category,
            RecordField::Category,
            &|r| r.category.clone(),
        );
        mismatches
    }
}

/// Plain equality never raises: a conflict or a missing fingerprint is `false`.
/// Records without a fingerprint are not even equal to themselves, so the
/// type deliberately does not implement `Eq`.
impl PartialEq for TransactionRecord {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.reconcile(other), Reconciliation::Same)
    }
}

impl Hash for TransactionRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.fingerprint {
            Some(fingerprint) => fingerprint.hash(state),
            None => {
                self.liquidity_change.hash(state);
                self.capital_change.hash(state);
                self.counter_party_alias.hash(state);
                self.date.hash(state);
                self.tags.hash(state);
                self.category.hash(state);
            }
        }
    }
}

impl Displayable for TransactionRecord {
    fn display_label(&self) -> String {
        format!(
            "{} {}: liquidity {}, capital {}, category {}, tags {}",
            self.date.format("%Y-%m-%d"),
            if self.counter_party_alias.is_empty() {
                "<anonymous>"
            } else {
                &self.counter_party_alias
            },
            self.liquidity_change,
            self.capital_change,
            self.category,
            format_tags(&self.tags)
        )
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label())
    }
}
