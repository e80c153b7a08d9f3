use kitty_domain::{GoalPatch, GroupId, SharedGoal};
use uuid::Uuid;

use crate::{
    error::{CoreError, CoreResult},
    store::DocumentStore,
    validation::{validate_goal_patch, GoalDraft},
};

/// Progress toward a goal, derived from the whole-ledger net position.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub goal_id: Uuid,
    pub name: String,
    pub target: f64,
    pub saved: f64,
}

impl GoalProgress {
    pub fn percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        self.saved / self.target * 100.0
    }

    pub fn remaining(&self) -> f64 {
        self.target - self.saved
    }

    pub fn reached(&self) -> bool {
        self.saved >= self.target
    }
}

pub struct GoalService;

impl GoalService {
    pub fn list(store: &dyn DocumentStore, group: &GroupId) -> CoreResult<Vec<SharedGoal>> {
        store
            .fetch_goals(group)
            .map_err(|err| CoreError::Fetch(err.to_string()))
    }

    pub fn add(
        store: &dyn DocumentStore,
        group: &GroupId,
        draft: &GoalDraft,
    ) -> CoreResult<SharedGoal> {
        draft.validate()?;
        let goal = SharedGoal::new(group.clone(), draft.name.trim(), draft.target);
        store.insert_goal(&goal).map_err(|err| {
            tracing::error!(error = %err, "failed to add goal");
            err
        })?;
        tracing::info!(id = %goal.id, name = %goal.name, "goal added");
        Ok(goal)
    }

    pub fn update(
        store: &dyn DocumentStore,
        group: &GroupId,
        id: Uuid,
        patch: &GoalPatch,
    ) -> CoreResult<SharedGoal> {
        validate_goal_patch(patch)?;
        Self::owned(store, group, id)?;
        let patch = GoalPatch {
            name: patch.name.as_ref().map(|name| name.trim().to_string()),
            target: patch.target,
        };
        let goal = store.update_goal(id, &patch).map_err(|err| {
            tracing::error!(id = %id, error = %err, "failed to update goal");
            err
        })?;
        tracing::info!(id = %id, "goal updated");
        Ok(goal)
    }

    pub fn remove(store: &dyn DocumentStore, group: &GroupId, id: Uuid) -> CoreResult<()> {
        Self::owned(store, group, id)?;
        store.remove_goal(id).map_err(|err| {
            tracing::error!(id = %id, error = %err, "failed to remove goal");
            err
        })?;
        tracing::info!(id = %id, "goal removed");
        Ok(())
    }

    /// `saved` is the ledger net clamped to `[0, target]`.
    pub fn progress(goal: &SharedGoal, total_income: f64, total_expense: f64) -> GoalProgress {
        let net = total_income - total_expense;
        GoalProgress {
            goal_id: goal.id,
            name: goal.name.clone(),
            target: goal.target,
            saved: net.clamp(0.0, goal.target.max(0.0)),
        }
    }

    fn owned(store: &dyn DocumentStore, group: &GroupId, id: Uuid) -> CoreResult<SharedGoal> {
        Self::list(store, group)?
            .into_iter()
            .find(|goal| goal.id == id)
            .ok_or(CoreError::GoalNotFound(id))
    }
}
