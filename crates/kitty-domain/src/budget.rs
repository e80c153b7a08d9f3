//! Monthly group budgets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::CategoryAllocations, common::*};

/// Expected income and per-category allocations for one group and month.
///
/// At most one budget exists per `(group_id, month, year)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBudget {
    pub id: Uuid,
    pub group_id: GroupId,
    pub month: u32,
    pub year: i32,
    pub expected_income: f64,
    #[serde(default)]
    pub categories: CategoryAllocations,
    pub expected_savings: f64,
}

impl GroupBudget {
    pub fn new(
        group_id: GroupId,
        period: MonthKey,
        expected_income: f64,
        categories: CategoryAllocations,
    ) -> Self {
        let mut budget = Self {
            id: Uuid::new_v4(),
            group_id,
            month: period.month,
            year: period.year,
            expected_income,
            categories,
            expected_savings: 0.0,
        };
        budget.recompute_savings();
        budget
    }

    pub fn period(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }

    pub fn matches(&self, group_id: &GroupId, period: MonthKey) -> bool {
        &self.group_id == group_id && self.month == period.month && self.year == period.year
    }

    pub fn total_allocated(&self) -> f64 {
        self.categories.total()
    }

    /// Replaces income and allocations, recomputing expected savings.
    pub fn revise(&mut self, expected_income: f64, categories: CategoryAllocations) {
        self.expected_income = expected_income;
        self.categories = categories;
        self.recompute_savings();
    }

    pub fn recompute_savings(&mut self) {
        self.expected_savings = self.expected_income - self.categories.total();
    }
}

impl Identifiable for GroupBudget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for GroupBudget {
    fn display_label(&self) -> String {
        format!(
            "{} budget for {} (income {:.2})",
            self.group_id,
            self.period(),
            self.expected_income
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn savings_follow_income_minus_allocations() {
        let period = MonthKey::new(2024, 1).unwrap();
        let mut budget = GroupBudget::new(
            GroupId::default(),
            period,
            3000.0,
            CategoryAllocations::from_partial([(Category::Food, 400.0), (Category::Housing, 1200.0)]),
        );
        assert_eq!(budget.expected_savings, 1400.0);

        budget.revise(2500.0, CategoryAllocations::from_partial([(Category::Food, 500.0)]));
        assert_eq!(budget.expected_savings, 2000.0);
        assert!(budget.matches(&GroupId::default(), period));
        assert!(!budget.matches(&GroupId::new("other"), period));
    }

    #[test]
    fn deserializing_without_categories_uses_zeroed_catalog() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "groupId": "g",
            "month": 2,
            "year": 2024,
            "expectedIncome": 100.0,
            "expectedSavings": 100.0
        }"#;
        let budget: GroupBudget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.total_allocated(), 0.0);
        assert_eq!(budget.period(), MonthKey::new(2024, 2).unwrap());
    }
}
