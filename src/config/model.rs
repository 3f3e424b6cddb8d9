use serde::{Deserialize, Serialize};

use crate::domain::common::{tags, Tags};
use crate::domain::counter_party::TransactionModifier;
use crate::ledger::registry::CounterPartyRegistry;

/// Known counter parties plus report preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub counter_parties: Vec<CounterPartyDefinition>,
    #[serde(default)]
    pub report: ReportOptions,
}

/// One registry entry; the first alias becomes the canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterPartyDefinition {
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub modifier: TransactionModifier,
}

impl CounterPartyDefinition {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            tags: Tags::new(),
            category: None,
            modifier: TransactionModifier::None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_modifier(mut self, modifier: TransactionModifier) -> Self {
        self.modifier = modifier;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub show_capital_change: bool,
    #[serde(default)]
    pub show_all_transactions: bool,
}

impl Config {
    /// Demo counter-party database shipped with the tool.
    pub fn template() -> Self {
        Self {
            counter_parties: vec![
                CounterPartyDefinition::new(["Systembolaget"])
                    .with_category("alcohol")
                    .with_tags(tags(["leisure"])),
                CounterPartyDefinition::new(["Ica", "ICA SUPERMARKET", "ICA NARA"])
                    .with_category("groceries"),
                CounterPartyDefinition::new(["Salary", "SALARY SYSTEM"]).with_category("salary"),
            ],
            report: ReportOptions {
                show_capital_change: true,
                show_all_transactions: true,
            },
        }
    }

    /// Registers every definition in order; returns how many were applied.
    pub fn apply(&self, registry: &CounterPartyRegistry) -> usize {
        let mut applied = 0;
        for definition in &self.counter_parties {
            if definition.aliases.is_empty() {
                tracing::warn!("skipping counter party definition without aliases");
                continue;
            }
            registry.register(
                &definition.aliases,
                definition.tags.clone(),
                definition.category.clone(),
                definition.modifier.clone(),
            );
            applied += 1;
        }
        tracing::debug!(applied, "bootstrapped counter party registry");
        applied
    }
}
