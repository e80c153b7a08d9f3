use kitty_domain::{EntryPatch, GroupId, LedgerEntry};
use uuid::Uuid;

use crate::{
    error::{CoreError, CoreResult},
    store::DocumentStore,
    validation::{validate_entry, validate_patch, EntryDraft},
};

/// Entry CRUD scoped to a group.
pub struct EntryService;

impl EntryService {
    pub fn list(store: &dyn DocumentStore, group: &GroupId) -> CoreResult<Vec<LedgerEntry>> {
        let entries = store
            .fetch_entries(group)
            .map_err(|err| CoreError::Fetch(err.to_string()))?;
        tracing::debug!(group = %group, count = entries.len(), "fetched entries");
        Ok(entries)
    }

    pub fn add(
        store: &dyn DocumentStore,
        group: &GroupId,
        draft: EntryDraft,
    ) -> CoreResult<LedgerEntry> {
        let entry = draft.validate(group)?;
        store.insert_entry(&entry).map_err(|err| {
            tracing::error!(error = %err, "failed to add entry");
            err
        })?;
        tracing::info!(id = %entry.id, group = %group, kind = %entry.kind, "entry added");
        Ok(entry)
    }

    /// Applies `patch` after checking the patched entry still validates.
    pub fn update(
        store: &dyn DocumentStore,
        group: &GroupId,
        id: Uuid,
        patch: &EntryPatch,
    ) -> CoreResult<LedgerEntry> {
        validate_patch(patch)?;
        let mut preview = Self::owned(store, group, id)?;
        preview.apply(patch);
        validate_entry(&preview)?;

        let updated = store.update_entry(id, patch).map_err(|err| {
            tracing::error!(id = %id, error = %err, "failed to update entry");
            err
        })?;
        tracing::info!(id = %id, "entry updated");
        Ok(updated)
    }

    pub fn remove(store: &dyn DocumentStore, group: &GroupId, id: Uuid) -> CoreResult<()> {
        Self::owned(store, group, id)?;
        store.remove_entry(id).map_err(|err| {
            tracing::error!(id = %id, error = %err, "failed to remove entry");
            err
        })?;
        tracing::info!(id = %id, "entry removed");
        Ok(())
    }

    fn owned(store: &dyn DocumentStore, group: &GroupId, id: Uuid) -> CoreResult<LedgerEntry> {
        Self::list(store, group)?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or(CoreError::EntryNotFound(id))
    }
}
