use chrono::NaiveDate;

use crate::domain::transaction::Fingerprint;
use crate::errors::{LedgerError, LedgerResult};

use super::{ParsedTransaction, StatementParser};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const LINES_PER_TRANSACTION: usize = 9;

const ALIAS_INDEX: usize = 0;
const TRANSACTION_DATE_INDEX: usize = 2;
const LIQUIDITY_CHANGE_INDEX: usize = 6;

/// Parses transactions copied in bulk from Swedbank's Internetbanken.
///
/// Each entry is a block of nine lines: counter party, blank, transaction
/// date, blank, booking date, blank, amount, blank, balance. Amounts use
/// spaces as thousands separators and a comma before the decimals; only the
/// whole units are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternetbankenParser;

impl InternetbankenParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_block(&self, index: usize, lines: &[&str]) -> LedgerResult<ParsedTransaction> {
        if lines.len() < LINES_PER_TRANSACTION {
            return Err(LedgerError::Parse {
                block: index,
                reason: format!(
                    "expected {} lines, found {}",
                    LINES_PER_TRANSACTION,
                    lines.len()
                ),
            });
        }

        let alias = lines[ALIAS_INDEX].trim();
        let raw_date = lines[TRANSACTION_DATE_INDEX].trim();
        let date =
            NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|err| LedgerError::Parse {
                block: index,
                reason: format!("invalid date `{raw_date}`: {err}"),
            })?;
        let raw_amount = lines[LIQUIDITY_CHANGE_INDEX];
        let liquidity_change = parse_amount(raw_amount).ok_or_else(|| LedgerError::Parse {
            block: index,
            reason: format!("invalid amount `{}`", raw_amount.trim()),
        })?;

        Ok(ParsedTransaction {
            counter_party_alias: alias.to_string(),
            date,
            liquidity_change,
            fingerprint: Fingerprint::of_lines(lines),
        })
    }
}

impl StatementParser for InternetbankenParser {
    fn parse(&self, content: &str) -> LedgerResult<Vec<ParsedTransaction>> {
        let lines: Vec<&str> = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        let mut parsed = Vec::new();
        for (index, block) in lines.chunks(LINES_PER_TRANSACTION).enumerate() {
            if block.iter().all(|line| line.trim().is_empty()) {
                continue;
            }
            parsed.push(self.parse_block(index, block)?);
        }
        tracing::info!(transactions = parsed.len(), "parsed internetbanken statement");
        Ok(parsed)
    }
}

/// `-1 234,50` becomes `-1234`.
fn parse_amount(raw: &str) -> Option<i64> {
    let compact: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}')
        .collect();
    let whole = compact.split(',').next()?;
    if whole.is_empty() || whole == "-" || whole == "+" {
        return None;
    }
    whole.parse().ok()
}
