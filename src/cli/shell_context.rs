use std::{path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use kitty_config::{Config, ConfigManager};
use kitty_core::GroupSession;
use kitty_storage_json::JsonDocumentStore;

use crate::cli::formatters::CliFormatters;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    /// Application home (`KITTY_HOME` or `~/.kitty`).
    pub home: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: Arc<JsonDocumentStore>,
    pub session: GroupSession,
    pub formatters: CliFormatters,
    pub last_command: Option<String>,
    pub running: bool,
}
