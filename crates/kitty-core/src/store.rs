use std::sync::RwLock;

use kitty_domain::{EntryPatch, GoalPatch, GroupBudget, GroupId, LedgerEntry, MonthKey, SharedGoal};
use uuid::Uuid;

use crate::CoreError;

/// Abstraction over the remote document collections backing a group.
///
/// Every query is scoped by group; the store never infers one.
pub trait DocumentStore: Send + Sync {
    fn fetch_entries(&self, group: &GroupId) -> Result<Vec<LedgerEntry>, CoreError>;
    fn insert_entry(&self, entry: &LedgerEntry) -> Result<(), CoreError>;
    fn update_entry(&self, id: Uuid, patch: &EntryPatch) -> Result<LedgerEntry, CoreError>;
    fn remove_entry(&self, id: Uuid) -> Result<(), CoreError>;

    fn find_budget(&self, group: &GroupId, period: MonthKey)
        -> Result<Option<GroupBudget>, CoreError>;
    fn list_budgets(&self, group: &GroupId) -> Result<Vec<GroupBudget>, CoreError>;
    fn insert_budget(&self, budget: &GroupBudget) -> Result<(), CoreError>;
    fn replace_budget(&self, budget: &GroupBudget) -> Result<(), CoreError>;

    fn fetch_goals(&self, group: &GroupId) -> Result<Vec<SharedGoal>, CoreError>;
    fn insert_goal(&self, goal: &SharedGoal) -> Result<(), CoreError>;
    fn update_goal(&self, id: Uuid, patch: &GoalPatch) -> Result<SharedGoal, CoreError>;
    fn remove_goal(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Full contents of a store, used for snapshots and bulk loads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreContents {
    pub entries: Vec<LedgerEntry>,
    pub budgets: Vec<GroupBudget>,
    pub goals: Vec<SharedGoal>,
}

/// Process-local store. Collections keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreContents>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: StoreContents) -> Self {
        Self {
            inner: RwLock::new(contents),
        }
    }

    pub fn contents(&self) -> Result<StoreContents, CoreError> {
        Ok(self.read()?.clone())
    }

    pub fn replace_contents(&self, contents: StoreContents) -> Result<(), CoreError> {
        *self.write()? = contents;
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreContents>, CoreError> {
        self.inner
            .read()
            .map_err(|_| CoreError::Storage("store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreContents>, CoreError> {
        self.inner
            .write()
            .map_err(|_| CoreError::Storage("store lock poisoned".into()))
    }
}

impl DocumentStore for InMemoryStore {
    fn fetch_entries(&self, group: &GroupId) -> Result<Vec<LedgerEntry>, CoreError> {
        Ok(self
            .read()?
            .entries
            .iter()
            .filter(|entry| &entry.group_id == group)
            .cloned()
            .collect())
    }

    fn insert_entry(&self, entry: &LedgerEntry) -> Result<(), CoreError> {
        self.write()?.entries.push(entry.clone());
        Ok(())
    }

    fn update_entry(&self, id: Uuid, patch: &EntryPatch) -> Result<LedgerEntry, CoreError> {
        let mut guard = self.write()?;
        let entry = guard
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(CoreError::EntryNotFound(id))?;
        entry.apply(patch);
        Ok(entry.clone())
    }

    fn remove_entry(&self, id: Uuid) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let before = guard.entries.len();
        guard.entries.retain(|entry| entry.id != id);
        if guard.entries.len() == before {
            return Err(CoreError::EntryNotFound(id));
        }
        Ok(())
    }

    fn find_budget(
        &self,
        group: &GroupId,
        period: MonthKey,
    ) -> Result<Option<GroupBudget>, CoreError> {
        Ok(self
            .read()?
            .budgets
            .iter()
            .find(|budget| budget.matches(group, period))
            .cloned())
    }

    fn list_budgets(&self, group: &GroupId) -> Result<Vec<GroupBudget>, CoreError> {
        Ok(self
            .read()?
            .budgets
            .iter()
            .filter(|budget| &budget.group_id == group)
            .cloned()
            .collect())
    }

    fn insert_budget(&self, budget: &GroupBudget) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        if guard
            .budgets
            .iter()
            .any(|existing| existing.matches(&budget.group_id, budget.period()))
        {
            return Err(CoreError::DuplicateBudget {
                group: budget.group_id.to_string(),
                period: budget.period().to_string(),
            });
        }
        guard.budgets.push(budget.clone());
        Ok(())
    }

    fn replace_budget(&self, budget: &GroupBudget) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let slot = guard
            .budgets
            .iter_mut()
            .find(|existing| existing.id == budget.id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget.id.to_string()))?;
        *slot = budget.clone();
        Ok(())
    }

    fn fetch_goals(&self, group: &GroupId) -> Result<Vec<SharedGoal>, CoreError> {
        Ok(self
            .read()?
            .goals
            .iter()
            .filter(|goal| &goal.group_id == group)
            .cloned()
            .collect())
    }

    fn insert_goal(&self, goal: &SharedGoal) -> Result<(), CoreError> {
        self.write()?.goals.push(goal.clone());
        Ok(())
    }

    fn update_goal(&self, id: Uuid, patch: &GoalPatch) -> Result<SharedGoal, CoreError> {
        let mut guard = self.write()?;
        let goal = guard
            .goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or(CoreError::GoalNotFound(id))?;
        goal.apply(patch);
        Ok(goal.clone())
    }

    fn remove_goal(&self, id: Uuid) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let before = guard.goals.len();
        guard.goals.retain(|goal| goal.id != id);
        if guard.goals.len() == before {
            return Err(CoreError::GoalNotFound(id));
        }
        Ok(())
    }
}
