use kitty_config::CONFIG_KEYS;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, Subcommand};
use crate::cli::ui::{Table, TableColumn};

/// Settings that select a different data directory.
const STORE_KEYS: [&str; 2] = ["project_id", "data_root"];

const SUBCOMMANDS: &[Subcommand] = &[
    Subcommand::new("show", config_show),
    Subcommand::new("set", config_set).arguments(&CONFIG_KEYS),
    Subcommand::new("backup", config_backup),
    Subcommand::new("backups", config_backups),
    Subcommand::new("restore", config_restore),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::with_subcommands(
        "config",
        "View and manage preferences",
        "config [show|set <key> <value>|backup [note]|backups|restore [name]]",
        SUBCOMMANDS,
    )
    .default_subcommand("show")]
}

fn config_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value @ ..] = args else {
        return Err(set_usage());
    };
    let value = value.join(" ");
    if value.trim().is_empty() {
        return Err(set_usage());
    }
    set_config_value(context, &key.to_lowercase(), value.trim())
}

fn set_usage() -> CommandError {
    CommandError::InvalidArguments(format!(
        "usage: config set <{}> <value>",
        CONFIG_KEYS.join("|")
    ))
}

fn config_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let backup = context
        .config_manager
        .backup(&context.config, note.as_deref())?;
    io::print_success(format!("Configuration backed up as `{}`.", backup.name));
    Ok(())
}

fn config_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = match args.first() {
        Some(name) => name.to_string(),
        None => match select_backup(context)? {
            Some(name) => name,
            None => {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
        },
    };
    restore_backup(context, &name)
}

fn config_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Configuration");
    for key in CONFIG_KEYS {
        let value = context.config.get(key).unwrap_or_default();
        io::print_info(format!("  {key:<19}: {value}"));
    }
    let profile = context.session.profile();
    io::print_info(format!(
        "  {:<19}: {}",
        "display_name",
        profile.person().unwrap_or("-")
    ));
    io::print_info(format!("  {:<19}: {}", "group_id", profile.group_id));
    io::print_info(format!(
        "  {:<19}: {}",
        "data_dir",
        context.store.paths().data_dir.display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context.config.set(key, value)?;
    context.config.profile = context.session.profile().clone();
    context.persist_config()?;
    context.apply_config(STORE_KEYS.contains(&key))?;
    io::print_success(format!(
        "{key} = {}",
        context.config.get(key).unwrap_or_default()
    ));
    Ok(())
}

fn config_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        io::print_info("No configuration backups yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::left("Name"), TableColumn::left("Created")]);
    for backup in &backups {
        table.add_row([
            backup.name.clone(),
            backup
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    table.print();
    Ok(())
}

fn select_backup(context: &ShellContext) -> Result<Option<String>, CommandError> {
    if !context.can_prompt() {
        return Err(CommandError::InvalidArguments(
            "usage: config restore <name>".into(),
        ));
    }
    let names: Vec<String> = context
        .config_manager
        .list_backups()?
        .into_iter()
        .map(|backup| backup.name)
        .collect();
    if names.is_empty() {
        return Err(CommandError::Message("No configuration backups to restore.".into()));
    }
    Ok(io::select_item(&context.theme, "Select configuration backup:", &names)?
        .map(|index| names[index].clone()))
}

/// Replaces the active configuration, including the signed-in profile.
fn restore_backup(context: &mut ShellContext, name: &str) -> CommandResult {
    context.config = context.config_manager.restore(name)?;
    context.persist_config()?;
    context.apply_config(true)?;
    io::print_success(format!("Configuration restored from `{name}`."));
    Ok(())
}
