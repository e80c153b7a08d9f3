//! Provides ledger aggregation: totals, per-person and per-category reductions,
//! daily and monthly rollups over a time-windowed slice of entries.

use std::{
    collections::{BTreeMap, HashMap},
    hash::Hash,
};

use chrono::NaiveDate;
use kitty_domain::{Category, LedgerEntry, MonthKey, TimeWindow};

/// Spent (expense) and saved (income) totals for one person.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonTotals {
    pub person: String,
    pub spent: f64,
    pub saved: f64,
}

impl PersonTotals {
    pub fn net_worth(&self) -> f64 {
        self.saved - self.spent
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonAmount {
    pub person: String,
    pub amount: f64,
}

/// Net (income minus expense) per person for a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyNet {
    pub date: NaiveDate,
    pub people: Vec<PersonAmount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub daily: f64,
    pub cumulative: f64,
}

/// Running balance for one person across every date in the aggregated slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonSeries {
    pub person: String,
    pub points: Vec<SeriesPoint>,
}

impl PersonSeries {
    pub fn final_balance(&self) -> f64 {
        self.points.last().map(|p| p.cumulative).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthRollup {
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
    pub entry_count: usize,
}

impl MonthRollup {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Every reduction the dashboard needs, computed in one pass family.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateResult {
    pub entry_count: usize,
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    /// First-seen order.
    pub by_person: Vec<PersonTotals>,
    /// First-seen order, expense entries only.
    pub by_category: Vec<CategoryTotal>,
    /// Ascending date order.
    pub by_date: Vec<DailyNet>,
    /// One series per person, same order as `by_person`.
    pub cumulative: Vec<PersonSeries>,
    /// Ascending month order.
    pub by_month: Vec<MonthRollup>,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn person(&self, name: &str) -> Option<&PersonTotals> {
        self.by_person.iter().find(|p| p.person == name)
    }

    pub fn people(&self) -> Vec<&str> {
        self.by_person.iter().map(|p| p.person.as_str()).collect()
    }

    /// Actual spend for `category`, 0 when nothing was spent.
    pub fn category_total(&self, category: Category) -> f64 {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.amount)
            .unwrap_or(0.0)
    }

    /// Category actuals keyed by catalog entry, ready for reconciliation.
    pub fn category_actuals(&self) -> BTreeMap<Category, f64> {
        self.by_category
            .iter()
            .map(|c| (c.category, c.amount))
            .collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.by_date.iter().map(|d| d.date).collect()
    }

    pub fn months(&self) -> Vec<MonthKey> {
        self.by_month.iter().map(|m| m.month).collect()
    }

    pub fn series_for(&self, person: &str) -> Option<&PersonSeries> {
        self.cumulative.iter().find(|s| s.person == person)
    }
}

/// Stateless aggregation over already-fetched entries.
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Aggregates the entries that fall inside `window` relative to `today`.
    pub fn aggregate(entries: &[LedgerEntry], window: TimeWindow, today: NaiveDate) -> AggregateResult {
        Self::aggregate_iter(entries.iter().filter(|e| window.contains(e.date, today)))
    }

    /// Aggregates a single calendar month.
    pub fn aggregate_month(entries: &[LedgerEntry], month: MonthKey) -> AggregateResult {
        Self::aggregate_iter(entries.iter().filter(|e| month.contains(e.date)))
    }

    /// Returns the entries inside `window`, preserving input order.
    pub fn filter_window<'a>(
        entries: &'a [LedgerEntry],
        window: TimeWindow,
        today: NaiveDate,
    ) -> Vec<&'a LedgerEntry> {
        entries
            .iter()
            .filter(|e| window.contains(e.date, today))
            .collect()
    }

    fn aggregate_iter<'a>(entries: impl Iterator<Item = &'a LedgerEntry>) -> AggregateResult {
        let mut result = AggregateResult::default();
        let mut people: Ordered<String, (f64, f64)> = Ordered::default();
        let mut categories: Ordered<Category, f64> = Ordered::default();
        let mut days: BTreeMap<NaiveDate, Ordered<String, f64>> = BTreeMap::new();
        let mut months: BTreeMap<MonthKey, MonthRollup> = BTreeMap::new();

        for entry in entries {
            result.entry_count += 1;
            let person = people.entry(entry.person.clone());
            let month = months
                .entry(MonthKey::of(entry.date))
                .or_insert_with(|| MonthRollup {
                    month: MonthKey::of(entry.date),
                    income: 0.0,
                    expense: 0.0,
                    entry_count: 0,
                });
            month.entry_count += 1;

            if entry.is_income() {
                result.total_income += entry.amount;
                person.1 += entry.amount;
                month.income += entry.amount;
            } else {
                result.total_expense += entry.amount;
                person.0 += entry.amount;
                month.expense += entry.amount;
                if let Some(category) = entry.category {
                    *categories.entry(category) += entry.amount;
                }
            }

            *days
                .entry(entry.date)
                .or_default()
                .entry(entry.person.clone()) += entry.signed_amount();
        }

        result.net = result.total_income - result.total_expense;
        result.by_person = people
            .items
            .into_iter()
            .map(|(person, (spent, saved))| PersonTotals {
                person,
                spent,
                saved,
            })
            .collect();
        result.by_category = categories
            .items
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect();
        result.cumulative = cumulative_series(&result.by_person, &days);
        result.by_date = days
            .into_iter()
            .map(|(date, per_person)| DailyNet {
                date,
                people: per_person
                    .items
                    .into_iter()
                    .map(|(person, amount)| PersonAmount { person, amount })
                    .collect(),
            })
            .collect();
        result.by_month = months.into_values().collect();
        result
    }
}

fn cumulative_series(
    people: &[PersonTotals],
    days: &BTreeMap<NaiveDate, Ordered<String, f64>>,
) -> Vec<PersonSeries> {
    people
        .iter()
        .map(|totals| {
            let mut running = 0.0;
            let points = days
                .iter()
                .map(|(date, per_person)| {
                    let daily = per_person.get(&totals.person).copied().unwrap_or(0.0);
                    running += daily;
                    SeriesPoint {
                        date: *date,
                        daily,
                        cumulative: running,
                    }
                })
                .collect();
            PersonSeries {
                person: totals.person.clone(),
                points,
            }
        })
        .collect()
}

/// Insertion-ordered accumulator keyed by first appearance.
struct Ordered<K, V> {
    index: HashMap<K, usize>,
    items: Vec<(K, V)>,
}

impl<K, V> Default for Ordered<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Default> Ordered<K, V> {
    fn entry(&mut self, key: K) -> &mut V {
        let position = match self.index.get(&key) {
            Some(position) => *position,
            None => {
                self.items.push((key.clone(), V::default()));
                let position = self.items.len() - 1;
                self.index.insert(key, position);
                position
            }
        };
        &mut self.items[position].1
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|position| &self.items[*position].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitty_domain::{EntryKind, GroupId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn income(person: &str, amount: f64, on: NaiveDate) -> LedgerEntry {
        LedgerEntry::new(GroupId::default(), on, person, amount, EntryKind::Income)
    }

    fn expense(person: &str, amount: f64, category: Category, on: NaiveDate) -> LedgerEntry {
        LedgerEntry::new(GroupId::default(), on, person, amount, EntryKind::Expense)
            .with_category(category)
    }

    #[test]
    fn empty_input_produces_zeroed_result() {
        let result = LedgerAggregator::aggregate(&[], TimeWindow::All, date(2024, 1, 1));
        assert!(result.is_empty());
        assert_eq!(result.total_income, 0.0);
        assert_eq!(result.net, 0.0);
        assert!(result.by_person.is_empty());
        assert!(result.by_category.is_empty());
        assert!(result.by_date.is_empty());
        assert!(result.by_month.is_empty());
    }

    #[test]
    fn income_and_food_expense_scenario() {
        let entries = vec![
            income("A", 1000.0, date(2024, 1, 5)),
            expense("A", 200.0, Category::Food, date(2024, 1, 10)),
        ];
        let result = LedgerAggregator::aggregate(&entries, TimeWindow::All, date(2026, 3, 1));
        assert_eq!(result.total_income, 1000.0);
        assert_eq!(result.total_expense, 200.0);
        assert_eq!(result.net, 800.0);
        assert_eq!(result.category_total(Category::Food), 200.0);
        let a = result.person("A").expect("person A");
        assert_eq!(a.spent, 200.0);
        assert_eq!(a.saved, 1000.0);
        assert_eq!(a.net_worth(), 800.0);
    }

    #[test]
    fn people_and_categories_keep_first_seen_order() {
        let entries = vec![
            expense("Zoe", 10.0, Category::Utilities, date(2024, 2, 1)),
            expense("Ann", 5.0, Category::Food, date(2024, 1, 1)),
            expense("Zoe", 1.0, Category::Food, date(2024, 3, 1)),
        ];
        let result = LedgerAggregator::aggregate(&entries, TimeWindow::All, date(2024, 3, 1));
        assert_eq!(result.people(), vec!["Zoe", "Ann"]);
        let categories: Vec<_> = result.by_category.iter().map(|c| c.category).collect();
        assert_eq!(categories, vec![Category::Utilities, Category::Food]);
        assert_eq!(result.category_total(Category::Food), 6.0);
        assert_eq!(
            result.dates(),
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn per_person_totals_sum_to_window_totals() {
        let entries = vec![
            income("A", 900.0, date(2024, 1, 2)),
            income("B", 350.5, date(2024, 1, 3)),
            expense("A", 120.25, Category::Food, date(2024, 1, 4)),
            expense("B", 80.0, Category::Transportation, date(2024, 1, 5)),
            expense("B", 15.0, Category::Food, date(2024, 1, 6)),
        ];
        let result = LedgerAggregator::aggregate(&entries, TimeWindow::All, date(2024, 1, 31));
        let spent: f64 = result.by_person.iter().map(|p| p.spent).sum();
        let saved: f64 = result.by_person.iter().map(|p| p.saved).sum();
        let by_category: f64 = result.by_category.iter().map(|c| c.amount).sum();
        assert!((spent - result.total_expense).abs() < 1e-9);
        assert!((saved - result.total_income).abs() < 1e-9);
        assert!((by_category - result.total_expense).abs() < 1e-9);
        assert_eq!(result.entry_count, entries.len());
    }

    #[test]
    fn income_never_lands_in_category_buckets() {
        let entries = vec![income("A", 50.0, date(2024, 1, 1)).with_category(Category::Savings)];
        let result = LedgerAggregator::aggregate(&entries, TimeWindow::All, date(2024, 1, 1));
        assert!(result.by_category.is_empty());
        assert_eq!(result.category_total(Category::Savings), 0.0);
    }

    #[test]
    fn cumulative_series_carries_balance_across_missing_days() {
        let entries = vec![
            income("A", 100.0, date(2024, 1, 1)),
            expense("B", 30.0, Category::Food, date(2024, 1, 2)),
            expense("A", 40.0, Category::Food, date(2024, 1, 3)),
            income("B", 10.0, date(2024, 1, 3)),
        ];
        let result = LedgerAggregator::aggregate(&entries, TimeWindow::All, date(2024, 1, 3));

        let a = result.series_for("A").unwrap();
        let a_balances: Vec<f64> = a.points.iter().map(|p| p.cumulative).collect();
        assert_eq!(a_balances, vec![100.0, 100.0, 60.0]);

        let b = result.series_for("B").unwrap();
        let b_daily: Vec<f64> = b.points.iter().map(|p| p.daily).collect();
        assert_eq!(b_daily, vec![0.0, -30.0, 10.0]);
        assert_eq!(b.final_balance(), -20.0);

        let third = &result.by_date[2];
        assert_eq!(third.people.len(), 2);
        assert_eq!(third.people[0].amount, -40.0);
    }

    #[test]
    fn monthly_rollups_sort_chronologically() {
        let entries = vec![
            expense("A", 20.0, Category::Food, date(2024, 2, 3)),
            income("A", 500.0, date(2023, 12, 31)),
            expense("A", 5.0, Category::Food, date(2024, 2, 28)),
        ];
        let result = LedgerAggregator::aggregate(&entries, TimeWindow::All, date(2024, 2, 28));
        assert_eq!(
            result.months(),
            vec![MonthKey::new(2023, 12).unwrap(), MonthKey::new(2024, 2).unwrap()]
        );
        let feb = &result.by_month[1];
        assert_eq!(feb.expense, 25.0);
        assert_eq!(feb.entry_count, 2);
        assert_eq!(feb.net(), -25.0);
    }

    #[test]
    fn windows_narrow_relative_to_today() {
        let today = date(2024, 6, 15);
        let entries = vec![
            income("A", 1.0, date(2024, 6, 1)),
            income("A", 10.0, date(2024, 2, 1)),
            income("A", 100.0, date(2023, 6, 1)),
        ];
        let all = LedgerAggregator::aggregate(&entries, TimeWindow::All, today);
        let year = LedgerAggregator::aggregate(&entries, TimeWindow::ThisYear, today);
        let month = LedgerAggregator::aggregate(&entries, TimeWindow::ThisMonth, today);
        assert_eq!(all.total_income, 111.0);
        assert_eq!(year.total_income, 11.0);
        assert_eq!(month.total_income, 1.0);
        assert_eq!(
            LedgerAggregator::filter_window(&entries, TimeWindow::ThisYear, today).len(),
            2
        );
    }

    #[test]
    fn aggregate_month_ignores_other_years() {
        let entries = vec![
            expense("A", 20.0, Category::Food, date(2024, 3, 3)),
            expense("A", 99.0, Category::Food, date(2023, 3, 3)),
        ];
        let march = LedgerAggregator::aggregate_month(&entries, MonthKey::new(2024, 3).unwrap());
        assert_eq!(march.total_expense, 20.0);
        assert_eq!(march.category_actuals().get(&Category::Food), Some(&20.0));
    }
}
