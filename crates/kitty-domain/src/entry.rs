//! Domain models for group ledger entries.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::*};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(EntryKind::Income),
            "expense" | "out" => Ok(EntryKind::Expense),
            other => Err(format!("unknown entry type `{other}` (use income or expense)")),
        }
    }
}

/// One income or expense record owned by a group ledger.
///
/// Stored documents may carry category text from outside the catalog. Such an
/// entry loads uncategorized and keeps the text in `unrecognized_category`, so
/// rewriting the collection does not lose it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEntry", into = "StoredEntry")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub group_id: GroupId,
    pub date: NaiveDate,
    pub person: String,
    pub company: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub category: Option<Category>,
    pub unrecognized_category: Option<String>,
    pub notes: Option<String>,
}

/// On-disk shape of [`LedgerEntry`]; the category stays free text here.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: Uuid,
    group_id: GroupId,
    date: NaiveDate,
    person: String,
    #[serde(default)]
    company: String,
    amount: f64,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl From<StoredEntry> for LedgerEntry {
    fn from(stored: StoredEntry) -> Self {
        let (category, unrecognized_category) = match stored.category {
            None => (None, None),
            Some(raw) => match Category::parse(&raw) {
                Some(category) => (Some(category), None),
                None => {
                    tracing::warn!(
                        entry = %stored.id,
                        category = %raw,
                        "category outside the catalog, entry loaded uncategorized"
                    );
                    (None, Some(raw))
                }
            },
        };
        Self {
            id: stored.id,
            group_id: stored.group_id,
            date: stored.date,
            person: stored.person,
            company: stored.company,
            amount: stored.amount,
            kind: stored.kind,
            category,
            unrecognized_category,
            notes: stored.notes,
        }
    }
}

impl From<LedgerEntry> for StoredEntry {
    fn from(entry: LedgerEntry) -> Self {
        let category = entry
            .category
            .map(|category| category.key().to_string())
            .or(entry.unrecognized_category);
        Self {
            id: entry.id,
            group_id: entry.group_id,
            date: entry.date,
            person: entry.person,
            company: entry.company,
            amount: entry.amount,
            kind: entry.kind,
            category,
            notes: entry.notes,
        }
    }
}

impl LedgerEntry {
    pub fn new(
        group_id: GroupId,
        date: NaiveDate,
        person: impl Into<String>,
        amount: f64,
        kind: EntryKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            date,
            person: person.into(),
            company: String::new(),
            amount,
            kind,
            category: None,
            unrecognized_category: None,
            notes: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self.unrecognized_category = None;
        self
    }

    /// Catalog label, the stored text for an unrecognized category, or `-`.
    pub fn category_label(&self) -> &str {
        match (&self.category, &self.unrecognized_category) {
            (Some(category), _) => category.label(),
            (None, Some(raw)) => raw,
            (None, None) => "-",
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, EntryKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, EntryKind::Expense)
    }

    /// Signed contribution to a running balance: income adds, expense subtracts.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }

    /// Applies the populated fields of `patch`.
    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(person) = &patch.person {
            self.person = person.clone();
        }
        if let Some(company) = &patch.company {
            self.company = company.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category) = patch.category {
            self.category = category;
            self.unrecognized_category = None;
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
    }
}

impl Identifiable for LedgerEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for LedgerEntry {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for LedgerEntry {
    fn display_label(&self) -> String {
        format!(
            "{} {} {} {:.2} [{}]",
            self.date,
            self.person,
            self.kind,
            self.amount,
            self.category_label()
        )
    }
}

/// Partial update for an existing entry. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub date: Option<NaiveDate>,
    pub person: Option<String>,
    pub company: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<EntryKind>,
    pub category: Option<Option<Category>>,
    pub notes: Option<Option<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self == &EntryPatch::default()
    }
}
