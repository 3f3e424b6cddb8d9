use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spendlog::config::Config;
use spendlog::domain::tags;
use spendlog::{AppContext, NewTransaction, TimeRange, TransactionQuery};

const ALIASES: [&str; 5] = ["Systembolaget", "ICA SUPERMARKET", "ICA NARA", "SALARY SYSTEM", "Kiosk"];

fn build_sample_context(txn_count: usize) -> AppContext {
    let mut context = AppContext::with_config(&Config::template());
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();

    for idx in 0..txn_count {
        let mut draft = NewTransaction::new()
            .liquidity_change(-((idx % 500) as i64))
            .counter_party(ALIASES[idx % ALIASES.len()])
            .date(start + Duration::days((idx % 365) as i64))
            .fingerprint(format!("bench-{idx}"));
        if idx % 7 == 0 {
            draft = draft.tags(tags(["weekly"]));
        }
        context.add_transaction(draft);
    }
    context
}

fn bench_queries(c: &mut Criterion) {
    let context = build_sample_context(black_box(10_000));
    let march = TimeRange::from_dates(
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    )
    .unwrap();

    let by_party = TransactionQuery::new().with_counter_party("Ica");
    c.bench_function("query_counter_party_10k", |b| {
        b.iter(|| black_box(context.total_liquidity_change(&by_party)))
    });

    let combined = TransactionQuery::new()
        .in_range(march)
        .without_category("alcohol")
        .without_tags(tags(["weekly"]));
    c.bench_function("query_combined_10k", |b| {
        b.iter(|| black_box(context.transactions(&combined).len()))
    });
}

fn bench_ingest(c: &mut Criterion) {
    c.bench_function("ingest_10k", |b| b.iter(|| build_sample_context(black_box(10_000))));
}

criterion_group!(benches, bench_queries, bench_ingest);
criterion_main!(benches);
