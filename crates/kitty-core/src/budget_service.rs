use kitty_domain::{GroupBudget, GroupId, MonthKey};

use crate::{
    error::{CoreError, CoreResult},
    store::DocumentStore,
    validation::BudgetDraft,
};

/// Whether an upsert created a new budget or revised an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetWrite {
    Created,
    Updated,
}

/// Monthly budget persistence with the one-per-month rule enforced by
/// querying before every write.
pub struct BudgetService;

impl BudgetService {
    pub fn find(
        store: &dyn DocumentStore,
        group: &GroupId,
        period: MonthKey,
    ) -> CoreResult<Option<GroupBudget>> {
        let budget = store
            .find_budget(group, period)
            .map_err(|err| CoreError::Fetch(err.to_string()))?;
        if budget.is_none() {
            tracing::warn!(group = %group, period = %period, "no budget for period");
        }
        Ok(budget)
    }

    /// All budgets of the group, oldest period first.
    pub fn list(store: &dyn DocumentStore, group: &GroupId) -> CoreResult<Vec<GroupBudget>> {
        let mut budgets = store
            .list_budgets(group)
            .map_err(|err| CoreError::Fetch(err.to_string()))?;
        budgets.sort_by_key(|budget| budget.period());
        Ok(budgets)
    }

    pub fn create(
        store: &dyn DocumentStore,
        group: &GroupId,
        draft: &BudgetDraft,
    ) -> CoreResult<GroupBudget> {
        let categories = draft.validate()?;
        if store.find_budget(group, draft.period)?.is_some() {
            return Err(CoreError::DuplicateBudget {
                group: group.to_string(),
                period: draft.period.to_string(),
            });
        }
        let budget = GroupBudget::new(
            group.clone(),
            draft.period,
            draft.expected_income,
            categories,
        );
        store.insert_budget(&budget).map_err(|err| {
            tracing::error!(period = %draft.period, error = %err, "failed to create budget");
            err
        })?;
        tracing::info!(group = %group, period = %draft.period, "budget created");
        Ok(budget)
    }

    /// Revises the existing budget for the draft's period.
    pub fn update(
        store: &dyn DocumentStore,
        group: &GroupId,
        draft: &BudgetDraft,
    ) -> CoreResult<GroupBudget> {
        let categories = draft.validate()?;
        let mut budget = store
            .find_budget(group, draft.period)?
            .ok_or_else(|| CoreError::BudgetNotFound(format!("{group} {}", draft.period)))?;
        budget.revise(draft.expected_income, categories);
        store.replace_budget(&budget).map_err(|err| {
            tracing::error!(period = %draft.period, error = %err, "failed to update budget");
            err
        })?;
        tracing::info!(group = %group, period = %draft.period, "budget updated");
        Ok(budget)
    }

    pub fn upsert(
        store: &dyn DocumentStore,
        group: &GroupId,
        draft: &BudgetDraft,
    ) -> CoreResult<(GroupBudget, BudgetWrite)> {
        if store.find_budget(group, draft.period)?.is_some() {
            Self::update(store, group, draft).map(|budget| (budget, BudgetWrite::Updated))
        } else {
            Self::create(store, group, draft).map(|budget| (budget, BudgetWrite::Created))
        }
    }
}
