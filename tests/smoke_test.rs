use chrono::NaiveDate;
use kitty::{
    init,
    kitty_core::{BudgetReconciler, LedgerAggregator},
    kitty_domain::{
        Category, CategoryAllocations, EntryKind, GroupBudget, GroupId, LedgerEntry, MonthKey,
        TimeWindow,
    },
};

#[test]
fn ledger_reconciliation_smoke() {
    init();

    let group = GroupId::default();
    let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let entries = vec![
        LedgerEntry::new(group.clone(), day, "A", 1000.0, EntryKind::Income),
        LedgerEntry::new(group.clone(), day, "B", 60.0, EntryKind::Expense)
            .with_category(Category::Utilities),
    ];

    let summary = LedgerAggregator::aggregate(&entries, TimeWindow::ThisMonth, day);
    assert_eq!(summary.entry_count, 2);
    assert_eq!(summary.people(), vec!["A", "B"]);

    let period = MonthKey::of(day);
    let budget = GroupBudget::new(
        group,
        period,
        1000.0,
        CategoryAllocations::from_partial([(Category::Utilities, 80.0)]),
    );
    let reconciliation = BudgetReconciler::reconcile_month(&entries, Some(&budget), period);
    let line = reconciliation
        .result()
        .and_then(|result| result.line(Category::Utilities))
        .expect("utilities line");
    assert_eq!(line.remaining, 20.0);
}
