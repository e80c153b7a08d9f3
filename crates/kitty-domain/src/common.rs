//! Shared traits, group identity, and calendar helpers for ledger primitives.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Group every new profile joins until it switches explicitly.
pub const DEFAULT_GROUP: &str = "default-group";

/// Exposes a stable identifier for documents stored under a group.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Opaque namespace shared by every member who sees the same ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(value: impl Into<String>) -> Self {
        let raw: String = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_GROUP
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self(DEFAULT_GROUP.to_string())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        GroupId::new(value)
    }
}

/// Calendar month used for budget scoping and monthly rollups.
///
/// Ordering is chronological because `year` is compared before `month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Builds a key, rejecting months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| MonthKeyError::Malformed(trimmed.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| MonthKeyError::Malformed(trimmed.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthKeyError::Malformed(trimmed.to_string()))?;
        MonthKey::new(year, month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthKeyError {
    MonthOutOfRange(u32),
    Malformed(String),
}

impl fmt::Display for MonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthKeyError::MonthOutOfRange(month) => {
                write!(f, "month {month} is outside 1-12")
            }
            MonthKeyError::Malformed(raw) => write!(f, "`{raw}` is not a YYYY-MM month"),
        }
    }
}

impl std::error::Error for MonthKeyError {}

/// Filter applied to ledger entries before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    #[default]
    All,
    ThisMonth,
    ThisYear,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::All, TimeWindow::ThisMonth, TimeWindow::ThisYear];

    /// Returns `true` when `date` falls inside the window relative to `today`.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            TimeWindow::All => true,
            TimeWindow::ThisMonth => date.year() == today.year() && date.month() == today.month(),
            TimeWindow::ThisYear => date.year() == today.year(),
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            TimeWindow::All => "all",
            TimeWindow::ThisMonth => "month",
            TimeWindow::ThisYear => "year",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeWindow::All => "All time",
            TimeWindow::ThisMonth => "This month",
            TimeWindow::ThisYear => "This year",
        };
        f.write_str(label)
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" | "all-time" | "alltime" => Ok(TimeWindow::All),
            "month" | "this-month" | "thismonth" => Ok(TimeWindow::ThisMonth),
            "year" | "this-year" | "thisyear" => Ok(TimeWindow::ThisYear),
            other => Err(format!("unknown time window `{other}` (use all, month or year)")),
        }
    }
}
