//! kitty-core
//!
//! Aggregation, reconciliation and group services for the shared ledger.
//! Depends on kitty-domain. No CLI, no terminal I/O; persistence goes through
//! the [`store::DocumentStore`] trait.

pub mod aggregation_service;
pub mod budget_service;
pub mod entry_service;
pub mod error;
pub mod format;
pub mod goal_service;
pub mod reconcile_service;
pub mod session;
pub mod store;
pub mod time;
pub mod validation;

pub use aggregation_service::*;
pub use budget_service::*;
pub use entry_service::*;
pub use error::CoreError;
pub use format::*;
pub use goal_service::*;
pub use reconcile_service::*;
pub use session::*;
pub use store::{DocumentStore, InMemoryStore, StoreContents};
pub use time::*;
pub use validation::{BudgetDraft, EntryDraft, GoalDraft};
