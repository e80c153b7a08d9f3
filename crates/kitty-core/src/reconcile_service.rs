//! Compares a month's budget allocation against actual category spend.

use std::{collections::BTreeMap, fmt};

use kitty_domain::{Category, GroupBudget, LedgerEntry, MonthKey};
use uuid::Uuid;

use crate::aggregation_service::LedgerAggregator;

/// Remaining amount at or below which a category is flagged as a warning.
///
/// Absolute currency amount, not a share of the allocation.
pub const WARNING_THRESHOLD: f64 = 25.0;

/// Tri-state indicator for a category's remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Ok,
    Warning,
    Over,
}

impl BudgetStatus {
    pub fn classify(remaining: f64) -> Self {
        if remaining <= 0.0 {
            BudgetStatus::Over
        } else if remaining <= WARNING_THRESHOLD {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::Ok => "ok",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Over => "over",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLine {
    pub category: Category,
    pub budgeted: f64,
    pub actual: f64,
    pub remaining: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileResult {
    pub budget_id: Uuid,
    pub period: MonthKey,
    pub expected_income: f64,
    /// Catalog order, one line per category.
    pub lines: Vec<CategoryLine>,
    pub total_budgeted: f64,
    pub total_actual: f64,
    pub expected_savings: f64,
    pub actual_income: f64,
    pub actual_expense: f64,
    pub actual_savings: f64,
    /// Same formula as `actual_savings`; both figures are surfaced.
    pub net_profit_loss: f64,
}

impl ReconcileResult {
    pub fn line(&self, category: Category) -> Option<&CategoryLine> {
        self.lines.iter().find(|line| line.category == category)
    }

    pub fn lines_with_status(&self, status: BudgetStatus) -> Vec<&CategoryLine> {
        self.lines.iter().filter(|line| line.status == status).collect()
    }
}

/// Outcome of reconciling a period. A missing budget is never replaced by a default.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    NoBudget,
    Reconciled(ReconcileResult),
}

impl Reconciliation {
    pub fn result(&self) -> Option<&ReconcileResult> {
        match self {
            Reconciliation::Reconciled(result) => Some(result),
            Reconciliation::NoBudget => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reconciliation::NoBudget)
    }
}

/// Stateless reconciliation utilities.
pub struct BudgetReconciler;

impl BudgetReconciler {
    /// Reconciles `budget` against pre-computed actuals.
    pub fn reconcile(
        budget: Option<&GroupBudget>,
        actuals: &BTreeMap<Category, f64>,
        actual_income: f64,
        actual_expense: f64,
    ) -> Reconciliation {
        let Some(budget) = budget else {
            return Reconciliation::NoBudget;
        };

        let lines: Vec<CategoryLine> = Category::ALL
            .iter()
            .map(|category| {
                let budgeted = budget.categories.get(*category);
                let actual = actuals.get(category).copied().unwrap_or(0.0);
                let remaining = budgeted - actual;
                CategoryLine {
                    category: *category,
                    budgeted,
                    actual,
                    remaining,
                    status: BudgetStatus::classify(remaining),
                }
            })
            .collect();

        let total_budgeted = lines.iter().map(|line| line.budgeted).sum();
        let total_actual = lines.iter().map(|line| line.actual).sum();
        let actual_savings = actual_income - actual_expense;

        Reconciliation::Reconciled(ReconcileResult {
            budget_id: budget.id,
            period: budget.period(),
            expected_income: budget.expected_income,
            lines,
            total_budgeted,
            total_actual,
            expected_savings: budget.expected_savings,
            actual_income,
            actual_expense,
            actual_savings,
            net_profit_loss: actual_income - actual_expense,
        })
    }

    /// Derives actuals from the entries dated inside `period` and reconciles them.
    pub fn reconcile_month(
        entries: &[LedgerEntry],
        budget: Option<&GroupBudget>,
        period: MonthKey,
    ) -> Reconciliation {
        if let Some(budget) = budget {
            if budget.period() != period {
                tracing::warn!(
                    budget = %budget.period(),
                    requested = %period,
                    "reconciling a budget against a different month"
                );
            }
        }
        let aggregate = LedgerAggregator::aggregate_month(entries, period);
        Self::reconcile(
            budget,
            &aggregate.category_actuals(),
            aggregate.total_income,
            aggregate.total_expense,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kitty_domain::{CategoryAllocations, EntryKind, GroupId};

    fn january() -> MonthKey {
        MonthKey::new(2024, 1).unwrap()
    }

    fn food_budget() -> GroupBudget {
        GroupBudget::new(
            GroupId::default(),
            january(),
            3000.0,
            CategoryAllocations::from_partial([(Category::Food, 400.0)]),
        )
    }

    #[test]
    fn status_thresholds_use_absolute_amounts() {
        assert_eq!(BudgetStatus::classify(-20.0), BudgetStatus::Over);
        assert_eq!(BudgetStatus::classify(0.0), BudgetStatus::Over);
        assert_eq!(BudgetStatus::classify(0.01), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify(25.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify(25.01), BudgetStatus::Ok);
    }

    #[test]
    fn overspent_food_is_flagged_over() {
        let budget = food_budget();
        let actuals = BTreeMap::from([(Category::Food, 420.0)]);
        let outcome = BudgetReconciler::reconcile(Some(&budget), &actuals, 0.0, 420.0);
        let result = outcome.result().expect("budget present");
        let food = result.line(Category::Food).unwrap();
        assert_eq!(food.remaining, -20.0);
        assert_eq!(food.status, BudgetStatus::Over);
        assert_eq!(result.expected_savings, 2600.0);
        assert_eq!(result.lines.len(), Category::ALL.len());
    }

    #[test]
    fn untouched_zero_allocations_read_as_over() {
        let budget = food_budget();
        let outcome = BudgetReconciler::reconcile(Some(&budget), &BTreeMap::new(), 0.0, 0.0);
        let housing = outcome.result().unwrap().line(Category::Housing).unwrap().clone();
        assert_eq!(housing.remaining, 0.0);
        assert_eq!(housing.status, BudgetStatus::Over);
    }

    #[test]
    fn savings_and_profit_share_a_formula() {
        let budget = food_budget();
        let outcome = BudgetReconciler::reconcile(Some(&budget), &BTreeMap::new(), 2000.0, 650.0);
        let result = outcome.result().unwrap();
        assert_eq!(result.actual_savings, 1350.0);
        assert_eq!(result.net_profit_loss, result.actual_savings);
    }

    #[test]
    fn missing_budget_is_signalled() {
        let outcome = BudgetReconciler::reconcile(None, &BTreeMap::new(), 10.0, 5.0);
        assert!(outcome.is_missing());
        assert!(outcome.result().is_none());
    }

    #[test]
    fn reconcile_month_uses_only_that_month() {
        let budget = food_budget();
        let entries = vec![
            LedgerEntry::new(
                GroupId::default(),
                NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                "A",
                380.0,
                EntryKind::Expense,
            )
            .with_category(Category::Food),
            LedgerEntry::new(
                GroupId::default(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                "A",
                999.0,
                EntryKind::Expense,
            )
            .with_category(Category::Food),
        ];
        let outcome = BudgetReconciler::reconcile_month(&entries, Some(&budget), january());
        let food = outcome.result().unwrap().line(Category::Food).unwrap().clone();
        assert_eq!(food.actual, 380.0);
        assert_eq!(food.status, BudgetStatus::Warning);
    }
}
