//! kitty-config
//!
//! Local preferences plus the resolved identity (display name and group).
//! Owns the Config data structure and its disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigBackup, ConfigManager};
pub use model::{Config, CONFIG_KEYS};
