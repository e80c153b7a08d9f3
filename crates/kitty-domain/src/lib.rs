//! kitty-domain
//!
//! Pure domain models (LedgerEntry, GroupBudget, SharedGoal, Category, etc.).
//! No I/O, no CLI, no storage. Only data types and core enums; lenient
//! loading of legacy category text is reported through `tracing`.

pub mod budget;
pub mod category;
pub mod common;
pub mod entry;
pub mod goal;
pub mod profile;

pub use budget::*;
pub use category::*;
pub use common::*;
pub use entry::*;
pub use goal::*;
pub use profile::*;

/// Schema version stamped on persisted collections.
pub const CURRENT_SCHEMA_VERSION: u8 = 1;
