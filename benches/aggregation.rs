use std::hint::black_box;

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, Criterion};
use kitty::kitty_core::{BudgetReconciler, LedgerAggregator};
use kitty::kitty_domain::{
    Category, CategoryAllocations, EntryKind, GroupBudget, GroupId, LedgerEntry, MonthKey,
    TimeWindow,
};

const PEOPLE: [&str; 4] = ["Alex", "Sam", "Jo", "Kim"];

fn build_entries(n: usize) -> Vec<LedgerEntry> {
    let group = GroupId::default();
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("start date");
    (0..n)
        .map(|i| {
            let date = start + Duration::days((i % 730) as i64);
            let person = PEOPLE[i % PEOPLE.len()];
            if i % 5 == 0 {
                LedgerEntry::new(group.clone(), date, person, 1500.0, EntryKind::Income)
            } else {
                let category = Category::ALL[i % Category::ALL.len()];
                LedgerEntry::new(group.clone(), date, person, (i % 97) as f64 + 3.5, EntryKind::Expense)
                    .with_category(category)
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let entries = build_entries(50_000);
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).expect("today");
    c.bench_function("aggregate_all_50k", |b| {
        b.iter(|| LedgerAggregator::aggregate(black_box(&entries), TimeWindow::All, today))
    });
    c.bench_function("aggregate_this_year_50k", |b| {
        b.iter(|| LedgerAggregator::aggregate(black_box(&entries), TimeWindow::ThisYear, today))
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let entries = build_entries(50_000);
    let period = MonthKey::new(2024, 6).expect("period");
    let allocations =
        CategoryAllocations::from_partial(Category::ALL.iter().map(|category| (*category, 250.0)));
    let budget = GroupBudget::new(GroupId::default(), period, 6000.0, allocations);
    c.bench_function("reconcile_month_50k", |b| {
        b.iter(|| BudgetReconciler::reconcile_month(black_box(&entries), Some(&budget), period))
    });
}

criterion_group!(benches, bench_aggregate, bench_reconcile);
criterion_main!(benches);
