use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to load data: {0}")]
    Fetch(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Budget not found: {0}")]
    BudgetNotFound(String),
    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("Budget already exists for {group} {period}")]
    DuplicateBudget { group: String, period: String },
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
