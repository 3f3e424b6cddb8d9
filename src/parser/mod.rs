//! Statement parsers turning raw bank exports into fingerprinted records.

pub mod internetbanken;

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::transaction::{Fingerprint, NewTransaction};
use crate::errors::LedgerResult;

pub use internetbanken::InternetbankenParser;

/// Raw fields of one statement entry plus its source fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    pub counter_party_alias: String,
    pub date: NaiveDate,
    pub liquidity_change: i64,
    pub fingerprint: Fingerprint,
}

impl ParsedTransaction {
    pub fn into_new_transaction(self) -> NewTransaction {
        let mut draft = NewTransaction::new()
            .liquidity_change(self.liquidity_change)
            .counter_party(self.counter_party_alias)
            .fingerprint(self.fingerprint);
        draft.date = self.date.and_hms_opt(0, 0, 0);
        draft
    }
}

pub trait StatementParser {
    fn parse(&self, content: &str) -> LedgerResult<Vec<ParsedTransaction>>;

    fn parse_file(&self, path: &Path) -> LedgerResult<Vec<ParsedTransaction>> {
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "parsing statement file");
        self.parse(&content)
    }
}
