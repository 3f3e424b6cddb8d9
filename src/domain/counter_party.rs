//! Counter-party identities shared by one or more statement aliases.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::domain::common::{format_tags, Displayable, NamedEntity, Tags};
use crate::domain::transaction::TransactionRecord;
use crate::errors::{LedgerError, LedgerResult};

/// Late adjustment applied to every new record that references an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionModifier {
    #[default]
    None,
    /// Forces the capital change to a fixed settlement amount, e.g. a mortgage payoff.
    FixedCapitalChange { amount: i64 },
    /// Copies the liquidity change into the capital change, for pure savings.
    MirrorLiquidity,
}

/// Capability to adjust a freshly constructed record.
pub trait RecordModifier {
    fn modify(&self, record: &mut TransactionRecord);
}

impl RecordModifier for TransactionModifier {
    fn modify(&self, record: &mut TransactionRecord) {
        match self {
            TransactionModifier::None => {}
            TransactionModifier::FixedCapitalChange { amount } => {
                record.set_capital_change(*amount);
            }
            TransactionModifier::MirrorLiquidity => {
                let liquidity = record.liquidity_change();
                record.set_capital_change(liquidity);
            }
        }
    }
}

impl fmt::Display for TransactionModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionModifier::None => write!(f, "none"),
            TransactionModifier::FixedCapitalChange { amount } => {
                write!(f, "fixed capital change ({amount})")
            }
            TransactionModifier::MirrorLiquidity => write!(f, "mirror liquidity"),
        }
    }
}

/// Canonical counter party that aliases resolve to.
///
/// Equality and hashing use the canonical name only. Use
/// [`CounterPartyIdentity::same_identity`] when two identities with the same
/// name must also agree on their definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterPartyIdentity {
    name: String,
    #[serde(default)]
    tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default)]
    modifier: TransactionModifier,
}

impl CounterPartyIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        let identity = Self {
            name: name.into(),
            tags: Tags::new(),
            category: None,
            modifier: TransactionModifier::None,
        };
        tracing::debug!(name = %identity.name, "instantiating counter party");
        identity
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn with_modifier(mut self, modifier: TransactionModifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn modifier(&self) -> &TransactionModifier {
        &self.modifier
    }

    /// Runs this identity's modifier against a new record.
    pub fn apply_modifier(&self, record: &mut TransactionRecord) {
        self.modifier.modify(record);
    }

    /// True when tags, category and modifier all agree, ignoring the name.
    pub fn same_definition(&self, other: &Self) -> bool {
        self.tags == other.tags
            && self.category == other.category
            && self.modifier == other.modifier
    }

    /// Compares names, reporting two same-named identities with diverging
    /// definitions as [`LedgerError::IdentityMismatch`].
    pub fn same_identity(&self, other: &Self) -> LedgerResult<bool> {
        if self.name != other.name {
            return Ok(false);
        }
        if self.same_definition(other) {
            Ok(true)
        } else {
            Err(LedgerError::IdentityMismatch {
                name: self.name.clone(),
            })
        }
    }
}

impl PartialEq for CounterPartyIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CounterPartyIdentity {}

impl Hash for CounterPartyIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl NamedEntity for CounterPartyIdentity {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for CounterPartyIdentity {
    fn display_label(&self) -> String {
        format!(
            "{} (category: {}, tags: {}, modifier: {})",
            self.name,
            self.category.as_deref().unwrap_or("-"),
            format_tags(&self.tags),
            self.modifier
        )
    }
}

impl fmt::Display for CounterPartyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
