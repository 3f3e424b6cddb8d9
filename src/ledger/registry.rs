use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::domain::common::{NamedEntity, Tags};
use crate::domain::counter_party::{CounterPartyIdentity, TransactionModifier};

/// Maps statement aliases to shared counter-party identities.
///
/// Unknown aliases are never an error: resolving one binds it to a fresh
/// default identity named after the alias.
#[derive(Debug, Default)]
pub struct CounterPartyRegistry {
    aliases: RwLock<IndexMap<String, Arc<CounterPartyIdentity>>>,
}

impl CounterPartyRegistry {
    pub fn new() -> Self {
        tracing::debug!("initializing counter party registry");
        Self::default()
    }

    /// Returns the identity bound to `alias`, creating it when missing.
    pub fn resolve(&self, alias: &str) -> Arc<CounterPartyIdentity> {
        if let Some(identity) = self.aliases.read().get(alias) {
            return Arc::clone(identity);
        }
        let mut aliases = self.aliases.write();
        let identity = aliases.entry(alias.to_string()).or_insert_with(|| {
            tracing::info!(alias, "alias is not in the counter party registry; adding it");
            Arc::new(CounterPartyIdentity::new(alias))
        });
        Arc::clone(identity)
    }

    /// Looks an alias up without creating a binding.
    pub fn get(&self, alias: &str) -> Option<Arc<CounterPartyIdentity>> {
        self.aliases.read().get(alias).cloned()
    }

    /// Binds every alias to one new identity named after the first alias.
    ///
    /// Existing bindings are replaced; each replacement is logged. An empty
    /// alias list is ignored.
    pub fn register<S: AsRef<str>>(
        &self,
        aliases: &[S],
        tags: Tags,
        category: Option<String>,
        modifier: TransactionModifier,
    ) {
        let Some(first) = aliases.first() else {
            tracing::debug!("ignoring counter party registration without aliases");
            return;
        };
        let identity = Arc::new(
            CounterPartyIdentity::new(first.as_ref())
                .with_tags(tags)
                .with_category(category)
                .with_modifier(modifier),
        );

        let mut bindings = self.aliases.write();
        let inconsistent = bindings
            .values()
            .any(|live| live.name() == identity.name() && !live.same_definition(&identity));
        if inconsistent {
            tracing::warn!(
                name = identity.name(),
                "registering counter party whose name is already used by a different definition"
            );
        }

        for alias in aliases {
            let alias = alias.as_ref();
            if let Some(previous) = bindings.insert(alias.to_string(), Arc::clone(&identity)) {
                tracing::warn!(
                    alias,
                    previous = previous.name(),
                    current = identity.name(),
                    "alias rebound to a new counter party"
                );
            }
        }
    }

    /// Distinct identities currently reachable through at least one alias.
    pub fn identities(&self) -> Vec<Arc<CounterPartyIdentity>> {
        let bindings = self.aliases.read();
        let mut seen = HashSet::new();
        bindings
            .values()
            .filter(|identity| seen.insert(Arc::as_ptr(identity)))
            .cloned()
            .collect()
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.identities()
            .iter()
            .map(|identity| identity.name().to_string())
            .collect()
    }

    pub fn aliases(&self) -> BTreeSet<String> {
        self.aliases.read().keys().cloned().collect()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.read().is_empty()
    }

    /// Drops every binding at once.
    pub fn reset(&self) {
        self.aliases.write().clear();
        tracing::debug!("reset counter party registry");
    }
}
