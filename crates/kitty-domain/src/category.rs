//! The fixed expense category catalog and per-category allocation maps.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Canonical expense catalog shared by entries, budget forms and reconciliation.
///
/// Variant order is the catalog order used for display and for `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Housing,
    Food,
    Utilities,
    Entertainment,
    Healthcare,
    Miscellaneous,
    Transportation,
    Insurance,
    Education,
    Childcare,
    Debt,
    Savings,
    Personal,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Housing,
        Category::Food,
        Category::Utilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Miscellaneous,
        Category::Transportation,
        Category::Insurance,
        Category::Education,
        Category::Childcare,
        Category::Debt,
        Category::Savings,
        Category::Personal,
    ];

    /// Stable storage key.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Housing => "housing",
            Category::Food => "food",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Healthcare => "healthcare",
            Category::Miscellaneous => "miscellaneous",
            Category::Transportation => "transportation",
            Category::Insurance => "insurance",
            Category::Education => "education",
            Category::Childcare => "childcare",
            Category::Debt => "debt",
            Category::Savings => "savings",
            Category::Personal => "personal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Housing => "Housing",
            Category::Food => "Food",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Miscellaneous => "Miscellaneous",
            Category::Transportation => "Transportation",
            Category::Insurance => "Insurance",
            Category::Education => "Education",
            Category::Childcare => "Childcare",
            Category::Debt => "Debt",
            Category::Savings => "Savings",
            Category::Personal => "Personal",
        }
    }

    /// Resolves a key, display label or legacy alias (`debtPayments`, `Personal Care`).
    pub fn parse(value: &str) -> Option<Category> {
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        let category = match normalized.as_str() {
            "housing" => Category::Housing,
            "food" => Category::Food,
            "utilities" => Category::Utilities,
            "entertainment" => Category::Entertainment,
            "healthcare" => Category::Healthcare,
            "miscellaneous" | "misc" => Category::Miscellaneous,
            "transportation" => Category::Transportation,
            "insurance" => Category::Insurance,
            "education" => Category::Education,
            "childcare" => Category::Childcare,
            "debt" | "debtpayments" => Category::Debt,
            "savings" => Category::Savings,
            "personal" | "personalcare" => Category::Personal,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Category::parse(&value).ok_or(UnknownCategory(value))
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.key().to_string()
    }
}

/// Raised when a category string is outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// Allocation per catalog category. Always total over [`Category::ALL`].
///
/// Stored keys outside the catalog are skipped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<Category, f64>")]
pub struct CategoryAllocations {
    amounts: BTreeMap<Category, f64>,
}

impl CategoryAllocations {
    pub fn zeroed() -> Self {
        Self {
            amounts: Category::ALL.iter().map(|c| (*c, 0.0)).collect(),
        }
    }

    /// Builds a total mapping; categories missing from `values` default to 0.
    pub fn from_partial(values: impl IntoIterator<Item = (Category, f64)>) -> Self {
        let mut allocations = Self::zeroed();
        for (category, amount) in values {
            allocations.set(category, amount);
        }
        allocations
    }

    pub fn get(&self, category: Category) -> f64 {
        self.amounts.get(&category).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, category: Category, amount: f64) {
        self.amounts.insert(category, amount);
    }

    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Iterates in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.amounts.iter().map(|(category, amount)| (*category, *amount))
    }
}

impl Default for CategoryAllocations {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<BTreeMap<Category, f64>> for CategoryAllocations {
    fn from(value: BTreeMap<Category, f64>) -> Self {
        Self::from_partial(value)
    }
}

impl From<BTreeMap<String, f64>> for CategoryAllocations {
    fn from(value: BTreeMap<String, f64>) -> Self {
        Self::from_partial(value.into_iter().filter_map(|(key, amount)| {
            let category = Category::parse(&key);
            if category.is_none() {
                tracing::warn!(category = %key, amount, "skipping allocation outside the catalog");
            }
            category.map(|category| (category, amount))
        }))
    }
}

impl From<CategoryAllocations> for BTreeMap<Category, f64> {
    fn from(value: CategoryAllocations) -> Self {
        value.amounts
    }
}
