use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::ReportOptions;
use crate::core::context::AppContext;
use crate::domain::common::NamedEntity;
use crate::domain::query::{TimeRange, TransactionQuery};
use crate::domain::transaction::TransactionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub label: String,
    pub liquidity_change: i64,
    pub capital_change: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub liquidity_change: i64,
    pub capital_change: i64,
    pub net_change: i64,
}

/// Aggregates handed to the presenter for one time range.
#[derive(Debug, Clone, Serialize)]
pub struct SpendingReport {
    pub range: TimeRange,
    pub options: ReportOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionRecord>>,
    pub tags: Vec<ReportLine>,
    pub categories: Vec<ReportLine>,
    pub counter_parties: Vec<ReportLine>,
    pub totals: ReportTotals,
}

pub struct SummaryService;

impl SummaryService {
    pub fn report(
        context: &AppContext,
        range: TimeRange,
        options: ReportOptions,
    ) -> SpendingReport {
        let in_range = TransactionQuery::new().in_range(range);
        let records = context.transactions(&in_range);

        let tags: BTreeSet<String> = records
            .iter()
            .flat_map(|record| record.tags().iter().cloned())
            .collect();
        let categories: BTreeSet<String> = records
            .iter()
            .map(|record| record.category().to_string())
            .collect();
        let counter_parties: BTreeSet<String> = records
            .iter()
            .map(|record| {
                context
                    .registry()
                    .resolve(record.counter_party_alias())
                    .name()
                    .to_string()
            })
            .collect();

        let tag_lines = tags
            .into_iter()
            .map(|tag| {
                let query = in_range.clone().with_tags(BTreeSet::from([tag.clone()]));
                Self::line(context, tag, &query)
            })
            .collect();

        let mut category_lines: Vec<ReportLine> = categories
            .into_iter()
            .map(|category| {
                let query = in_range.clone().with_category(category.clone());
                Self::line(context, category, &query)
            })
            .collect();
        category_lines.sort_by_key(|line| line.liquidity_change);

        let mut party_lines: Vec<ReportLine> = counter_parties
            .into_iter()
            .map(|name| {
                let query = in_range.clone().with_counter_party(name.clone());
                Self::line(context, name, &query)
            })
            .collect();
        party_lines.sort_by_key(|line| line.liquidity_change);

        let transactions = options
            .show_all_transactions
            .then(|| records.iter().map(|record| (*record).clone()).collect());

        SpendingReport {
            range,
            options,
            transactions,
            tags: tag_lines,
            categories: category_lines,
            counter_parties: party_lines,
            totals: ReportTotals {
                liquidity_change: context.total_liquidity_change(&in_range),
                capital_change: context.total_capital_change(&in_range),
                net_change: context.total_net_change(&in_range),
            },
        }
    }

    fn line(context: &AppContext, label: String, query: &TransactionQuery) -> ReportLine {
        ReportLine {
            label,
            liquidity_change: context.total_liquidity_change(query),
            capital_change: context.total_capital_change(query),
        }
    }
}
