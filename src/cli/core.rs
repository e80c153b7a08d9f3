//! Core CLI dispatch, error types and shell context helpers.

use std::{io, path::Path, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use kitty_config::{Config, ConfigError, ConfigManager};
use kitty_core::{CoreError, GroupSession, SystemClock};
use kitty_storage_json::{JsonDocumentStore, StoragePaths};
use strsim::levenshtein;

pub use crate::errors::CliError;
pub use crate::cli::shell_context::{CliMode, ShellContext};

use super::commands;
use super::formatters::CliFormatters;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
use crate::utils::app_home;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Sign in first with `login <name>`.")]
    NotSignedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotSignedIn => CommandError::NotSignedIn,
            CoreError::Validation(message) => CommandError::InvalidArguments(message),
            other => CommandError::Core(other),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Input(message) => CommandError::InvalidArguments(message),
            other => CommandError::Message(other.to_string()),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let home = app_home();
        let config_manager = ConfigManager::with_base_dir(&home)?;
        let config = config_manager.load()?;
        apply_output_preferences(&config, mode);

        let store = open_store(&config, &home)?;
        let session = GroupSession::new(
            store.clone(),
            Arc::new(SystemClock),
            config.profile.clone(),
        );

        let mut context = Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            home,
            formatters: CliFormatters::from_config(&config),
            config_manager,
            config,
            store,
            session,
            last_command: None,
            running: true,
        };
        context.initial_load()?;
        Ok(context)
    }

    /// A failed first load is reported but does not stop the shell.
    fn initial_load(&mut self) -> Result<(), CliError> {
        match self.session.refresh() {
            Ok(()) => Ok(()),
            Err(err) => self.report_error(err.into()),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(route) = self.registry.resolve(command, args) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let (handler, rest) = route?;
        match handler(self, rest) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::NotSignedIn => {
                cli_io::print_error(CommandError::NotSignedIn);
                cli_io::print_hint("Try `login Alex` to get started.");
            }
            CommandError::Core(err @ CoreError::Fetch(_)) => {
                cli_io::print_error(err);
                cli_io::print_hint("Use `refresh` to retry.");
            }
            CommandError::Core(
                err @ (CoreError::Storage(_) | CoreError::Io(_) | CoreError::Serde(_)),
            ) => {
                cli_io::print_error(format!("Failed to save changes. {err}"));
                cli_io::print_hint("Nothing was changed locally.");
            }
            other => cli_io::print_error(other),
        }
        Ok(())
    }

    pub(crate) fn prompt(&self) -> String {
        match self.session.profile().person() {
            Some(person) => format!("kitty[{person}@{}]> ", self.session.group()),
            None => format!("kitty[{}]> ", self.session.group()),
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }


    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn persist_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Copies the session identity into the config and saves it.
    pub(crate) fn persist_profile(&mut self) -> Result<(), CommandError> {
        self.config.profile = self.session.profile().clone();
        self.persist_config()
    }

    /// Re-applies a changed configuration: output styling, formatters and,
    /// when the data directory moved, a fresh store and session.
    pub(crate) fn apply_config(&mut self, reopen: bool) -> Result<(), CommandError> {
        apply_output_preferences(&self.config, self.mode);
        self.formatters = CliFormatters::from_config(&self.config);
        if reopen {
            self.reopen_store()?;
        }
        Ok(())
    }

    pub(crate) fn reopen_store(&mut self) -> Result<(), CommandError> {
        let store = open_store(&self.config, &self.home)?;
        let profile = self.config.profile.clone();
        self.session = GroupSession::new(store.clone(), Arc::new(SystemClock), profile);
        self.store = store;
        self.session.refresh()?;
        Ok(())
    }
}

fn open_store(config: &Config, home: &Path) -> Result<Arc<JsonDocumentStore>, CoreError> {
    let data_dir = config.resolve_data_dir(home);
    tracing::debug!(path = %data_dir.display(), "opening document store");
    JsonDocumentStore::new(StoragePaths::under(&data_dir)).map(Arc::new)
}

fn apply_output_preferences(config: &Config, mode: CliMode) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled,
        plain_mode: mode == CliMode::Script || !config.ui_color_enabled,
    });
}
