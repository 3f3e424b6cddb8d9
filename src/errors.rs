use std::fmt;

use thiserror::Error;

use crate::domain::transaction::{FieldMismatch, Fingerprint};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Parse error in statement block {block}: {reason}")]
    Parse { block: usize, reason: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationConflict),
    #[error("Counter party `{name}` exists with a different definition")]
    IdentityMismatch { name: String },
}

/// Raised when two records share a fingerprint but disagree on content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ReconciliationConflict {
    pub fingerprint: Fingerprint,
    pub mismatches: Vec<FieldMismatch>,
}

impl fmt::Display for ReconciliationConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint {} matches but ", self.fingerprint.short())?;
        let fields: Vec<String> = self
            .mismatches
            .iter()
            .map(|m| {
                format!(
                    "{} differs (existing: {}, incoming: {})",
                    m.field, m.existing, m.incoming
                )
            })
            .collect();
        write!(f, "{}", fields.join("; "))
    }
}
