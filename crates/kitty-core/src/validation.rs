//! Parse-or-reject helpers applied at the form boundary.
//!
//! Aggregation and reconciliation assume amounts that already passed through
//! these checks: finite and non-negative.

use chrono::NaiveDate;
use kitty_domain::{
    Category, CategoryAllocations, EntryKind, EntryPatch, GoalPatch, GroupId, LedgerEntry,
    MonthKey,
};

use crate::error::{CoreError, CoreResult};

/// Parses a non-negative currency amount such as `1,250.50` or `$40`.
pub fn parse_amount(raw: &str) -> CoreResult<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(CoreError::Validation("amount is required".into()));
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| CoreError::Validation(format!("`{}` is not a number", raw.trim())))?;
    check_amount("amount", value)?;
    Ok(value)
}

/// Parses an amount that must be strictly positive (goal targets).
pub fn parse_positive_amount(raw: &str) -> CoreResult<f64> {
    let value = parse_amount(raw)?;
    check_positive("target", value)?;
    Ok(value)
}

pub fn parse_date(raw: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!("invalid date `{}` (use YYYY-MM-DD)", raw.trim()))
    })
}

pub fn parse_month(raw: &str) -> CoreResult<u32> {
    let month: u32 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("invalid month `{}`", raw.trim())))?;
    if !(1..=12).contains(&month) {
        return Err(CoreError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    Ok(month)
}

pub fn parse_year(raw: &str) -> CoreResult<i32> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("invalid year `{}`", raw.trim())))?;
    if !(1900..=9999).contains(&year) {
        return Err(CoreError::Validation(format!("year {year} is out of range")));
    }
    Ok(year)
}

pub fn parse_period(month: &str, year: &str) -> CoreResult<MonthKey> {
    let month = parse_month(month)?;
    let year = parse_year(year)?;
    MonthKey::new(year, month).map_err(|err| CoreError::Validation(err.to_string()))
}

pub fn parse_category(raw: &str) -> CoreResult<Category> {
    Category::parse(raw)
        .ok_or_else(|| CoreError::Validation(format!("unknown category `{}`", raw.trim())))
}

pub fn parse_kind(raw: &str) -> CoreResult<EntryKind> {
    raw.parse::<EntryKind>().map_err(CoreError::Validation)
}

fn check_amount(field: &str, value: f64) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> CoreResult<()> {
    check_amount(field, value)?;
    if value == 0.0 {
        return Err(CoreError::Validation(format!("{field} must be greater than zero")));
    }
    Ok(())
}

fn check_person(person: &str) -> CoreResult<()> {
    if person.trim().is_empty() {
        return Err(CoreError::Validation("person is required".into()));
    }
    Ok(())
}

/// Unvalidated entry form input.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub person: String,
    pub company: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub category: Option<Category>,
    pub notes: Option<String>,
}

impl EntryDraft {
    pub fn new(date: NaiveDate, person: impl Into<String>, amount: f64, kind: EntryKind) -> Self {
        Self {
            date,
            person: person.into(),
            company: String::new(),
            amount,
            kind,
            category: None,
            notes: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks the draft and stamps it into an entry owned by `group_id`.
    pub fn validate(self, group_id: &GroupId) -> CoreResult<LedgerEntry> {
        check_person(&self.person)?;
        check_amount("amount", self.amount)?;
        if self.kind == EntryKind::Expense && self.category.is_none() {
            return Err(CoreError::Validation(
                "expense entries need a category".into(),
            ));
        }
        let mut entry = LedgerEntry::new(
            group_id.clone(),
            self.date,
            self.person.trim(),
            self.amount,
            self.kind,
        )
        .with_company(self.company.trim());
        entry.category = self.category;
        if let Some(notes) = self.notes {
            entry = entry.with_notes(notes);
        }
        Ok(entry)
    }
}

/// Validates an entry after a patch has been applied to it.
pub fn validate_entry(entry: &LedgerEntry) -> CoreResult<()> {
    check_person(&entry.person)?;
    check_amount("amount", entry.amount)?;
    if entry.is_expense() && entry.category.is_none() {
        return Err(CoreError::Validation(
            "expense entries need a category".into(),
        ));
    }
    Ok(())
}

pub fn validate_patch(patch: &EntryPatch) -> CoreResult<()> {
    if patch.is_empty() {
        return Err(CoreError::Validation("nothing to update".into()));
    }
    if let Some(amount) = patch.amount {
        check_amount("amount", amount)?;
    }
    if let Some(person) = &patch.person {
        check_person(person)?;
    }
    Ok(())
}

/// Unvalidated budget form input. Categories left out default to 0.
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub period: MonthKey,
    pub expected_income: f64,
    pub allocations: Vec<(Category, f64)>,
}

impl BudgetDraft {
    pub fn new(period: MonthKey, expected_income: f64) -> Self {
        Self {
            period,
            expected_income,
            allocations: Vec::new(),
        }
    }

    pub fn allocate(mut self, category: Category, amount: f64) -> Self {
        self.allocations.push((category, amount));
        self
    }

    pub fn validate(&self) -> CoreResult<CategoryAllocations> {
        check_amount("expected income", self.expected_income)?;
        for (category, amount) in &self.allocations {
            check_amount(category.key(), *amount)?;
        }
        Ok(CategoryAllocations::from_partial(
            self.allocations.iter().copied(),
        ))
    }
}

/// Unvalidated goal form input.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub name: String,
    pub target: f64,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, target: f64) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("goal name is required".into()));
        }
        check_positive("target", self.target)
    }
}

pub fn validate_goal_patch(patch: &GoalPatch) -> CoreResult<()> {
    if patch.name.is_none() && patch.target.is_none() {
        return Err(CoreError::Validation("nothing to update".into()));
    }
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("goal name is required".into()));
        }
    }
    if let Some(target) = patch.target {
        check_positive("target", target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn amounts_reject_garbage_instead_of_coercing() {
        assert_eq!(parse_amount("1,250.50").unwrap(), 1250.5);
        assert_eq!(parse_amount("$40").unwrap(), 40.0);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn goal_targets_must_be_positive() {
        assert!(parse_positive_amount("0").is_err());
        assert_eq!(parse_positive_amount("500").unwrap(), 500.0);
    }

    #[test]
    fn periods_are_range_checked() {
        assert!(parse_period("13", "2024").is_err());
        assert!(parse_period("0", "2024").is_err());
        assert_eq!(
            parse_period("2", "2024").unwrap(),
            MonthKey::new(2024, 2).unwrap()
        );
    }

    #[test]
    fn expense_drafts_require_a_category() {
        let group = GroupId::default();
        let draft = EntryDraft::new(date(), "A", 20.0, EntryKind::Expense);
        assert!(draft.clone().validate(&group).is_err());
        let entry = draft.category(Category::Food).validate(&group).unwrap();
        assert_eq!(entry.category, Some(Category::Food));
        assert_eq!(entry.group_id, group);
    }

    #[test]
    fn income_drafts_may_skip_category() {
        let entry = EntryDraft::new(date(), " A ", 1000.0, EntryKind::Income)
            .company("Acme")
            .validate(&GroupId::default())
            .unwrap();
        assert_eq!(entry.person, "A");
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.category, None);
    }

    #[test]
    fn budget_drafts_reject_negative_allocations() {
        let period = MonthKey::new(2024, 1).unwrap();
        let draft = BudgetDraft::new(period, 3000.0).allocate(Category::Food, -1.0);
        assert!(draft.validate().is_err());
        let ok = BudgetDraft::new(period, 3000.0)
            .allocate(Category::Food, 400.0)
            .validate()
            .unwrap();
        assert_eq!(ok.total(), 400.0);
    }

    #[test]
    fn empty_patches_are_rejected() {
        assert!(validate_patch(&EntryPatch::default()).is_err());
        assert!(validate_goal_patch(&GoalPatch::default()).is_err());
        let patch = GoalPatch {
            target: Some(0.0),
            ..GoalPatch::default()
        };
        assert!(validate_goal_patch(&patch).is_err());
    }
}
