mod common;

use common::{statement_block, template_context, write_file, MARCH_STATEMENT};
use spendlog::config::ReportOptions;
use spendlog::core::services::SummaryService;
use spendlog::parser::{InternetbankenParser, StatementParser};
use spendlog::{LedgerError, TimeRange, TransactionQuery};

#[test]
fn parse_file_reads_every_block() {
    let path = write_file("march.txt", &MARCH_STATEMENT);
    let parsed = InternetbankenParser::new().parse_file(&path).unwrap();
    let aliases: Vec<&str> = parsed.iter().map(|t| t.counter_party_alias.as_str()).collect();
    assert_eq!(aliases, ["Systembolaget", "ICA SUPERMARKET", "ICA NARA", "SALARY SYSTEM"]);
    assert_eq!(parsed[3].liquidity_change, 25000);
}

#[test]
fn reimporting_a_statement_adds_nothing() {
    let parsed = InternetbankenParser::new().parse(&MARCH_STATEMENT).unwrap();
    let mut context = template_context();

    let first = context.ingest(parsed.clone());
    let second = context.ingest(parsed);

    assert_eq!(first.inserted, 4);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.duplicates, 4);
    assert_eq!(context.ledger().len(), 4);
}

#[test]
fn overlapping_statements_merge() {
    let older = [
        statement_block("ICA NARA", "2025-03-24", "-50,00", "24 950,00"),
        statement_block("SALARY SYSTEM", "2025-03-01", "25 000,00", "25 000,00"),
    ]
    .concat();
    let parser = InternetbankenParser::new();
    let mut context = template_context();
    context.ingest(parser.parse(&older).unwrap());
    let summary = context.ingest(parser.parse(&MARCH_STATEMENT).unwrap());

    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.duplicates, 2);
    assert_eq!(
        context.total_liquidity_change(&TransactionQuery::new()),
        25000 - 100 - 300 - 50
    );
}

#[test]
fn statement_feeds_the_report() {
    let mut context = template_context();
    context.ingest(InternetbankenParser::new().parse(&MARCH_STATEMENT).unwrap());
    let range = TimeRange::from_dates(
        chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    )
    .unwrap();
    let report = SummaryService::report(&context, range, ReportOptions::default());

    let categories: Vec<&str> = report.categories.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(categories, ["groceries", "alcohol", "salary"]);
    assert_eq!(report.totals.liquidity_change, 24550);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = InternetbankenParser::new()
        .parse_file(std::path::Path::new("/no/such/statement.txt"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Io(_)));
}
