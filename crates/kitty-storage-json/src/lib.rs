//! kitty-storage-json
//!
//! Local-disk [`DocumentStore`]: one pretty-printed JSON file per collection,
//! written atomically, plus retained whole-store snapshots.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, NaiveDateTime, Utc};
use kitty_core::{CoreError, DocumentStore, StoreContents};
use kitty_domain::{
    EntryPatch, GoalPatch, GroupBudget, GroupId, LedgerEntry, MonthKey, SharedGoal,
    CURRENT_SCHEMA_VERSION,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

const JSON_EXTENSION: &str = "json";
const SNAPSHOT_PREFIX: &str = "snapshot_";
const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

const ENTRIES: &str = "entries";
const BUDGETS: &str = "budgets";
const GOALS: &str = "goals";

/// Directories used by [`JsonDocumentStore`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
    pub snapshots_dir: PathBuf,
}

impl StoragePaths {
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.to_path_buf(),
            snapshots_dir: root.join("snapshots"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

#[derive(Deserialize)]
struct Collection<T> {
    schema_version: u8,
    documents: Vec<T>,
}

#[derive(Serialize)]
struct CollectionRef<'a, T> {
    schema_version: u8,
    documents: &'a [T],
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    schema_version: u8,
    created_at: DateTime<Utc>,
    entries: Vec<LedgerEntry>,
    budgets: Vec<GroupBudget>,
    goals: Vec<SharedGoal>,
}

/// Filesystem-backed document collections.
pub struct JsonDocumentStore {
    paths: StoragePaths,
    retention: usize,
    /// Serialises read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl JsonDocumentStore {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_dir)?;
        fs::create_dir_all(&paths.snapshots_dir)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
            write_lock: Mutex::new(()),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.paths
            .data_dir
            .join(format!("{collection}.{JSON_EXTENSION}"))
    }

    /// Every document in every collection, regardless of group.
    pub fn contents(&self) -> Result<StoreContents, CoreError> {
        Ok(StoreContents {
            entries: self.read_collection(ENTRIES)?,
            budgets: self.read_collection(BUDGETS)?,
            goals: self.read_collection(GOALS)?,
        })
    }

    pub fn create_snapshot(&self, note: Option<&str>) -> Result<SnapshotInfo, CoreError> {
        let _guard = self.lock()?;
        let contents = self.contents()?;
        let created_at = Utc::now();
        let mut stem = format!(
            "{SNAPSHOT_PREFIX}{}",
            created_at.format(SNAPSHOT_TIMESTAMP_FORMAT)
        );
        if let Some(label) = slug(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let (name, path) = self.unused_snapshot_name(&stem);
        let file = SnapshotFile {
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at,
            entries: contents.entries,
            budgets: contents.budgets,
            goals: contents.goals,
        };
        let json = to_json(&file)?;
        write_atomic(&path, &json)?;
        self.prune_snapshots()?;
        tracing::info!(snapshot = %name, "snapshot created");
        Ok(SnapshotInfo {
            created_at: parse_snapshot_timestamp(&name),
            size_bytes: json.len() as u64,
            name,
            path,
        })
    }

    /// `stem.json`, or `stem_2.json`, `stem_3.json`... when taken.
    fn unused_snapshot_name(&self, stem: &str) -> (String, PathBuf) {
        let mut name = format!("{stem}.{JSON_EXTENSION}");
        let mut counter = 1;
        loop {
            let path = self.paths.snapshots_dir.join(&name);
            if !path.exists() {
                return (name, path);
            }
            counter += 1;
            name = format!("{stem}_{counter}.{JSON_EXTENSION}");
        }
    }

    /// Snapshots, newest first.
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotInfo>, CoreError> {
        if !self.paths.snapshots_dir.exists() {
            return Ok(Vec::new());
        }
        let mut rows = Vec::new();
        for entry in fs::read_dir(&self.paths.snapshots_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !name.starts_with(SNAPSHOT_PREFIX) {
                continue;
            }
            rows.push(SnapshotInfo {
                name: name.to_string(),
                created_at: parse_snapshot_timestamp(name),
                size_bytes: fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0),
                path: path.clone(),
            });
        }
        rows.sort_by_key(|info| Reverse((info.created_at, info.name.clone())));
        Ok(rows)
    }

    /// Replaces every collection with the snapshot's contents.
    pub fn restore_snapshot(&self, name: &str) -> Result<StoreContents, CoreError> {
        let path = self.paths.snapshots_dir.join(name);
        if name.contains(['/', '\\']) || !path.is_file() {
            return Err(CoreError::InvalidOperation(format!(
                "snapshot `{name}` not found"
            )));
        }
        let data = fs::read_to_string(&path)?;
        let file: SnapshotFile =
            serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
        check_schema(file.schema_version)?;

        let _guard = self.lock()?;
        self.write_collection(ENTRIES, &file.entries)?;
        self.write_collection(BUDGETS, &file.budgets)?;
        self.write_collection(GOALS, &file.goals)?;
        tracing::info!(snapshot = %name, entries = file.entries.len(), "snapshot restored");
        Ok(StoreContents {
            entries: file.entries,
            budgets: file.budgets,
            goals: file.goals,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, CoreError> {
        self.write_lock
            .lock()
            .map_err(|_| CoreError::Storage("storage lock poisoned".into()))
    }

    fn read_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, CoreError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        let parsed: Collection<T> = serde_json::from_str(&data).map_err(|err| {
            CoreError::Serde(format!("{}: {err}", path.display()))
        })?;
        check_schema(parsed.schema_version)?;
        Ok(parsed.documents)
    }

    fn write_collection<T: Serialize>(&self, collection: &str, documents: &[T]) -> Result<(), CoreError> {
        let path = self.collection_path(collection);
        let json = to_json(&CollectionRef {
            schema_version: CURRENT_SCHEMA_VERSION,
            documents,
        })?;
        write_atomic(&path, &json)
    }

    /// Runs `change` against one collection while holding the write lock.
    fn modify<T, R>(
        &self,
        collection: &str,
        change: impl FnOnce(&mut Vec<T>) -> Result<R, CoreError>,
    ) -> Result<R, CoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let _guard = self.lock()?;
        let mut documents = self.read_collection(collection)?;
        let outcome = change(&mut documents)?;
        self.write_collection(collection, &documents)?;
        Ok(outcome)
    }

    fn prune_snapshots(&self) -> Result<(), CoreError> {
        for stale in self.list_snapshots()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                tracing::warn!(snapshot = %stale.name, error = %err, "failed to prune snapshot");
            }
        }
        Ok(())
    }
}

impl DocumentStore for JsonDocumentStore {
    fn fetch_entries(&self, group: &GroupId) -> Result<Vec<LedgerEntry>, CoreError> {
        let mut entries: Vec<LedgerEntry> = self.read_collection(ENTRIES)?;
        entries.retain(|entry| &entry.group_id == group);
        Ok(entries)
    }

    fn insert_entry(&self, entry: &LedgerEntry) -> Result<(), CoreError> {
        self.modify(ENTRIES, |entries: &mut Vec<LedgerEntry>| {
            entries.push(entry.clone());
            Ok(())
        })
    }

    fn update_entry(&self, id: Uuid, patch: &EntryPatch) -> Result<LedgerEntry, CoreError> {
        self.modify(ENTRIES, |entries: &mut Vec<LedgerEntry>| {
            let entry = entries
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or(CoreError::EntryNotFound(id))?;
            entry.apply(patch);
            Ok(entry.clone())
        })
    }

    fn remove_entry(&self, id: Uuid) -> Result<(), CoreError> {
        self.modify(ENTRIES, |entries: &mut Vec<LedgerEntry>| {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                return Err(CoreError::EntryNotFound(id));
            }
            Ok(())
        })
    }

    fn find_budget(
        &self,
        group: &GroupId,
        period: MonthKey,
    ) -> Result<Option<GroupBudget>, CoreError> {
        let budgets: Vec<GroupBudget> = self.read_collection(BUDGETS)?;
        Ok(budgets
            .into_iter()
            .find(|budget| budget.matches(group, period)))
    }

    fn list_budgets(&self, group: &GroupId) -> Result<Vec<GroupBudget>, CoreError> {
        let mut budgets: Vec<GroupBudget> = self.read_collection(BUDGETS)?;
        budgets.retain(|budget| &budget.group_id == group);
        Ok(budgets)
    }

    fn insert_budget(&self, budget: &GroupBudget) -> Result<(), CoreError> {
        self.modify(BUDGETS, |budgets: &mut Vec<GroupBudget>| {
            if budgets
                .iter()
                .any(|existing| existing.matches(&budget.group_id, budget.period()))
            {
                return Err(CoreError::DuplicateBudget {
                    group: budget.group_id.to_string(),
                    period: budget.period().to_string(),
                });
            }
            budgets.push(budget.clone());
            Ok(())
        })
    }

    fn replace_budget(&self, budget: &GroupBudget) -> Result<(), CoreError> {
        self.modify(BUDGETS, |budgets: &mut Vec<GroupBudget>| {
            let slot = budgets
                .iter_mut()
                .find(|existing| existing.id == budget.id)
                .ok_or_else(|| CoreError::BudgetNotFound(budget.id.to_string()))?;
            *slot = budget.clone();
            Ok(())
        })
    }

    fn fetch_goals(&self, group: &GroupId) -> Result<Vec<SharedGoal>, CoreError> {
        let mut goals: Vec<SharedGoal> = self.read_collection(GOALS)?;
        goals.retain(|goal| &goal.group_id == group);
        Ok(goals)
    }

    fn insert_goal(&self, goal: &SharedGoal) -> Result<(), CoreError> {
        self.modify(GOALS, |goals: &mut Vec<SharedGoal>| {
            goals.push(goal.clone());
            Ok(())
        })
    }

    fn update_goal(&self, id: Uuid, patch: &GoalPatch) -> Result<SharedGoal, CoreError> {
        self.modify(GOALS, |goals: &mut Vec<SharedGoal>| {
            let goal = goals
                .iter_mut()
                .find(|goal| goal.id == id)
                .ok_or(CoreError::GoalNotFound(id))?;
            goal.apply(patch);
            Ok(goal.clone())
        })
    }

    fn remove_goal(&self, id: Uuid) -> Result<(), CoreError> {
        self.modify(GOALS, |goals: &mut Vec<SharedGoal>| {
            let before = goals.len();
            goals.retain(|goal| goal.id != id);
            if goals.len() == before {
                return Err(CoreError::GoalNotFound(id));
            }
            Ok(())
        })
    }
}

fn check_schema(version: u8) -> Result<(), CoreError> {
    if version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "schema version {version} is newer than supported version {CURRENT_SCHEMA_VERSION}"
        )));
    }
    Ok(())
}

fn slug(note: Option<&str>) -> Option<String> {
    let words: Vec<String> = note?
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

fn parse_snapshot_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name
        .strip_prefix(SNAPSHOT_PREFIX)?
        .strip_suffix(JSON_EXTENSION)?
        .trim_end_matches('.');
    let mut parts = stem.splitn(3, '_');
    let raw = format!("{}{}", parts.next()?, parts.next()?);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes to a sibling `.tmp` file, then renames it over `path`.
fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(|err| CoreError::Serde(err.to_string()))
}
