//! Explicit per-group context: store handle, clock, identity and the cached
//! snapshot the dashboards read from.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use kitty_domain::{
    EntryPatch, GoalPatch, GroupBudget, GroupId, LedgerEntry, MonthKey, SharedGoal, TimeWindow,
    UserProfile,
};
use uuid::Uuid;

use crate::{
    aggregation_service::{AggregateResult, LedgerAggregator},
    budget_service::{BudgetService, BudgetWrite},
    entry_service::EntryService,
    error::{CoreError, CoreResult},
    goal_service::{GoalProgress, GoalService},
    reconcile_service::{BudgetReconciler, Reconciliation},
    store::DocumentStore,
    time::Clock,
    validation::{BudgetDraft, EntryDraft, GoalDraft},
};

/// Everything fetched for one group at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    pub entries: Vec<LedgerEntry>,
    pub budgets: Vec<GroupBudget>,
    pub goals: Vec<SharedGoal>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl LedgerSnapshot {
    pub fn budget_for(&self, period: MonthKey) -> Option<&GroupBudget> {
        self.budgets.iter().find(|budget| budget.period() == period)
    }
}

/// Sequence token identifying one fetch. Only the newest ticket for the
/// current group may overwrite the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    group: GroupId,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

pub struct GroupSession {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    profile: UserProfile,
    snapshot: LedgerSnapshot,
    issued: u64,
    applied: u64,
    /// Tickets below this were issued before the last group switch.
    floor: u64,
}

impl GroupSession {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, profile: UserProfile) -> Self {
        Self {
            store,
            clock,
            profile,
            snapshot: LedgerSnapshot::default(),
            issued: 0,
            applied: 0,
            floor: 0,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn group(&self) -> &GroupId {
        &self.profile.group_id
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn current_period(&self) -> MonthKey {
        MonthKey::of(self.today())
    }

    /// Leaves the current identity untouched when `name` is blank.
    pub fn sign_in(&mut self, name: &str) -> CoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("display name is required".into()));
        }
        self.profile.sign_in(name);
        tracing::info!(person = name, "signed in");
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.profile.sign_out();
        tracing::info!("signed out");
    }

    /// Name recorded on new entries.
    pub fn person(&self) -> CoreResult<&str> {
        self.profile.person().ok_or(CoreError::NotSignedIn)
    }

    /// Moves the session to another group. The snapshot is cleared and every
    /// in-flight fetch becomes stale before the new group is loaded.
    pub fn switch_group(&mut self, group: GroupId) -> CoreResult<()> {
        tracing::info!(from = %self.profile.group_id, to = %group, "switching group");
        self.profile.group_id = group;
        self.snapshot = LedgerSnapshot::default();
        self.floor = self.issued + 1;
        self.refresh()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            seq: self.issued,
            group: self.profile.group_id.clone(),
        }
    }

    /// Reads every collection for the ticket's group. Does not touch the snapshot.
    pub fn load(&self, ticket: &FetchTicket) -> CoreResult<LedgerSnapshot> {
        let store = self.store.as_ref();
        Ok(LedgerSnapshot {
            entries: EntryService::list(store, &ticket.group)?,
            budgets: BudgetService::list(store, &ticket.group)?,
            goals: GoalService::list(store, &ticket.group)?,
            fetched_at: Some(self.clock.now()),
        })
    }

    /// Applies a fetch result unless a newer fetch already landed or the
    /// group changed since the ticket was issued. Failures leave the snapshot
    /// untouched.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: CoreResult<LedgerSnapshot>,
    ) -> CoreResult<FetchOutcome> {
        if ticket.seq < self.floor
            || ticket.seq <= self.applied
            || ticket.group != self.profile.group_id
        {
            tracing::warn!(
                ticket = ticket.seq,
                applied = self.applied,
                group = %ticket.group,
                "discarding stale fetch"
            );
            return Ok(FetchOutcome::Stale);
        }
        let snapshot = result.map_err(|err| match err {
            CoreError::Fetch(_) => err,
            other => CoreError::Fetch(other.to_string()),
        })?;
        tracing::debug!(
            ticket = ticket.seq,
            entries = snapshot.entries.len(),
            budgets = snapshot.budgets.len(),
            goals = snapshot.goals.len(),
            "snapshot applied"
        );
        self.snapshot = snapshot;
        self.applied = ticket.seq;
        Ok(FetchOutcome::Applied)
    }

    pub fn refresh(&mut self) -> CoreResult<()> {
        let ticket = self.begin_fetch();
        let result = self.load(&ticket);
        self.complete_fetch(ticket, result).map(|_| ())
    }

    pub fn add_entry(&mut self, draft: EntryDraft) -> CoreResult<LedgerEntry> {
        self.person()?;
        let entry = EntryService::add(self.store.as_ref(), &self.profile.group_id, draft)?;
        self.snapshot.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn update_entry(&mut self, id: Uuid, patch: &EntryPatch) -> CoreResult<LedgerEntry> {
        self.person()?;
        let updated = EntryService::update(self.store.as_ref(), &self.profile.group_id, id, patch)?;
        if let Some(slot) = self.snapshot.entries.iter_mut().find(|entry| entry.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub fn remove_entry(&mut self, id: Uuid) -> CoreResult<()> {
        self.person()?;
        EntryService::remove(self.store.as_ref(), &self.profile.group_id, id)?;
        self.snapshot.entries.retain(|entry| entry.id != id);
        Ok(())
    }

    pub fn save_budget(&mut self, draft: &BudgetDraft) -> CoreResult<(GroupBudget, BudgetWrite)> {
        self.person()?;
        let (budget, write) =
            BudgetService::upsert(self.store.as_ref(), &self.profile.group_id, draft)?;
        match self
            .snapshot
            .budgets
            .iter_mut()
            .find(|existing| existing.id == budget.id)
        {
            Some(slot) => *slot = budget.clone(),
            None => {
                self.snapshot.budgets.push(budget.clone());
                self.snapshot.budgets.sort_by_key(|budget| budget.period());
            }
        }
        Ok((budget, write))
    }

    pub fn add_goal(&mut self, draft: &GoalDraft) -> CoreResult<SharedGoal> {
        self.person()?;
        let goal = GoalService::add(self.store.as_ref(), &self.profile.group_id, draft)?;
        self.snapshot.goals.push(goal.clone());
        Ok(goal)
    }

    pub fn update_goal(&mut self, id: Uuid, patch: &GoalPatch) -> CoreResult<SharedGoal> {
        self.person()?;
        let goal = GoalService::update(self.store.as_ref(), &self.profile.group_id, id, patch)?;
        if let Some(slot) = self.snapshot.goals.iter_mut().find(|existing| existing.id == id) {
            *slot = goal.clone();
        }
        Ok(goal)
    }

    pub fn remove_goal(&mut self, id: Uuid) -> CoreResult<()> {
        self.person()?;
        GoalService::remove(self.store.as_ref(), &self.profile.group_id, id)?;
        self.snapshot.goals.retain(|goal| goal.id != id);
        Ok(())
    }

    pub fn summary(&self, window: TimeWindow) -> AggregateResult {
        LedgerAggregator::aggregate(&self.snapshot.entries, window, self.today())
    }

    pub fn month_summary(&self, period: MonthKey) -> AggregateResult {
        LedgerAggregator::aggregate_month(&self.snapshot.entries, period)
    }

    pub fn reconcile(&self, period: MonthKey) -> Reconciliation {
        BudgetReconciler::reconcile_month(
            &self.snapshot.entries,
            self.snapshot.budget_for(period),
            period,
        )
    }

    pub fn goal_progress(&self) -> Vec<GoalProgress> {
        let totals = self.summary(TimeWindow::All);
        self.snapshot
            .goals
            .iter()
            .map(|goal| GoalService::progress(goal, totals.total_income, totals.total_expense))
            .collect()
    }

    /// Resolves a full id or a unique prefix of one against the snapshot.
    pub fn resolve_entry(&self, token: &str) -> CoreResult<Uuid> {
        resolve_prefix(self.snapshot.entries.iter().map(|entry| entry.id), token)
    }

    pub fn resolve_goal(&self, token: &str) -> CoreResult<Uuid> {
        resolve_prefix(self.snapshot.goals.iter().map(|goal| goal.id), token)
    }
}

fn resolve_prefix(ids: impl Iterator<Item = Uuid>, token: &str) -> CoreResult<Uuid> {
    let token = token.trim().to_ascii_lowercase();
    if token.is_empty() {
        return Err(CoreError::Validation("an id is required".into()));
    }
    let matches: Vec<Uuid> = ids
        .filter(|id| id.to_string().starts_with(&token))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CoreError::InvalidOperation(format!("no record matches `{token}`"))),
        _ => Err(CoreError::InvalidOperation(format!(
            "`{token}` is ambiguous ({} matches)",
            matches.len()
        ))),
    }
}
