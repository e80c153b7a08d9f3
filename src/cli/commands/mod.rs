//! Shell commands grouped by concern. Each module exposes `definitions()`,
//! with subcommand tables for the commands that route further.

pub mod backup;
pub mod budget;
pub mod config;
pub mod dashboard;
pub mod entry;
pub mod goal;
pub mod identity;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(identity::definitions());
    commands.extend(entry::definitions());
    commands.extend(dashboard::definitions());
    commands.extend(budget::definitions());
    commands.extend(goal::definitions());
    commands.extend(backup::definitions());
    commands.extend(config::definitions());
    commands
}

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_names_are_unique() {
        let definitions = all_definitions();
        let mut names: Vec<_> = definitions.iter().map(|entry| entry.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn every_command_documents_its_usage() {
        for entry in all_definitions() {
            assert!(!entry.description.is_empty(), "{}", entry.name);
            assert!(entry.usage.starts_with(entry.name), "{}", entry.name);
            for sub in entry.subcommands() {
                assert!(
                    entry.usage.contains(sub.name),
                    "{} {} is missing from the usage text",
                    entry.name,
                    sub.name
                );
            }
        }
    }
}
