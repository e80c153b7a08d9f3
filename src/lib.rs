#![doc(test(attr(deny(warnings))))]

//! Kitty is a shared household ledger: group members record income and
//! expenses, plan monthly category budgets, track shared savings goals and
//! read the results from a command shell.
//!
//! The computational pieces live in the workspace crates and are re-exported
//! here for convenience.

pub mod cli;
pub mod errors;
pub mod utils;

pub use kitty_config;
pub use kitty_core;
pub use kitty_domain;
pub use kitty_storage_json;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("kitty tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
