use std::fmt::Write;

use colored::Colorize;

use crate::core::services::{ReportLine, SpendingReport};
use crate::domain::common::NamedEntity;
use crate::ledger::CounterPartyRegistry;

const SEPARATOR: &str = "========================================================";

fn header(text: &str) -> String {
    text.bold().to_string()
}

fn push_lines(buf: &mut String, title: &str, lines: &[ReportLine], show_capital: bool) {
    let _ = writeln!(buf, "{}", header(title));
    for line in lines {
        let _ = writeln!(buf, "  {}:", line.label);
        let _ = writeln!(buf, "    liquidity: {}", line.liquidity_change);
        if show_capital {
            let _ = writeln!(buf, "    capital change: {}", line.capital_change);
        }
    }
    let _ = writeln!(buf, "{SEPARATOR}");
}

/// Formats a report as the sectioned plain-text summary.
pub fn render_report(report: &SpendingReport) -> String {
    let mut buf = String::new();
    let show_capital = report.options.show_capital_change;

    let title = format!(
        " Summary of economy between {} and {} ",
        report.range.start, report.range.end
    );
    let _ = writeln!(buf, "{}", header(&title));
    let _ = writeln!(buf, "{SEPARATOR}");

    if let Some(transactions) = &report.transactions {
        let _ = writeln!(buf, "{}", header("All transactions:"));
        for record in transactions {
            let _ = writeln!(buf, "  {record}");
        }
        let _ = writeln!(buf, "{SEPARATOR}");
    }

    push_lines(&mut buf, "Tags:", &report.tags, show_capital);
    push_lines(&mut buf, "Categories:", &report.categories, show_capital);
    push_lines(&mut buf, "Counter Parties:", &report.counter_parties, show_capital);

    let _ = writeln!(buf, "{}", header("Total:"));
    let _ = writeln!(buf, "  liquidity: {}", report.totals.liquidity_change);
    let _ = writeln!(buf, "  capital change: {}", report.totals.capital_change);
    let _ = writeln!(buf, "  net change: {}", report.totals.net_change);
    buf
}

/// One `alias -> name [category]` line per registered alias, sorted by alias.
pub fn render_aliases(registry: &CounterPartyRegistry) -> String {
    let mut buf = String::new();
    for alias in registry.aliases() {
        let Some(identity) = registry.get(&alias) else {
            continue;
        };
        match identity.category() {
            Some(category) => {
                let _ = writeln!(buf, "{alias} -> {} [{category}]", identity.name());
            }
            None => {
                let _ = writeln!(buf, "{alias} -> {}", identity.name());
            }
        }
    }
    buf
}
