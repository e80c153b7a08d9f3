//! Snapshots of the local document store.

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{CommandEntry, Subcommand};
use crate::cli::ui::{Table, TableColumn};

const SUBCOMMANDS: &[Subcommand] = &[
    Subcommand::new("create", backup_create),
    Subcommand::new("list", backup_list),
    Subcommand::new("restore", backup_restore),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::with_subcommands(
        "backup",
        "Snapshot or restore every stored collection",
        "backup create [note]
backup list
backup restore [name]",
        SUBCOMMANDS,
    )]
}


fn backup_create(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context.store.create_snapshot(note.as_deref())?;
    io::print_success(format!("Snapshot `{}` created.", info.name));
    Ok(())
}

fn backup_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshots = context.store.list_snapshots()?;
    if snapshots.is_empty() {
        io::print_info("No snapshots yet. Use `backup create [note]`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Name"),
        TableColumn::left("Created"),
        TableColumn::right("Size"),
    ]);
    for snapshot in &snapshots {
        table.add_row([
            snapshot.name.clone(),
            snapshot
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".into()),
            format!("{} B", snapshot.size_bytes),
        ]);
    }
    table.print();
    Ok(())
}

fn backup_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = match args.first() {
        Some(name) => name.to_string(),
        None => {
            if !context.can_prompt() {
                return Err(CommandError::InvalidArguments(
                    "usage: backup restore <name>".into(),
                ));
            }
            let names: Vec<String> = context
                .store
                .list_snapshots()?
                .into_iter()
                .map(|snapshot| snapshot.name)
                .collect();
            if names.is_empty() {
                io::print_info("No snapshots to restore.");
                return Ok(());
            }
            match io::select_item(&context.theme, "Select snapshot:", &names)? {
                Some(index) => names[index].clone(),
                None => {
                    io::print_info("Operation cancelled.");
                    return Ok(());
                }
            }
        }
    };

    if context.can_prompt()
        && !io::confirm_action(
            &context.theme,
            &format!("Replace all stored data with `{name}`?"),
            false,
        )?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let restored = context.store.restore_snapshot(&name)?;
    io::print_success(format!(
        "Restored `{name}` ({} entries across all groups).",
        restored.entries.len()
    ));
    context.session.refresh()?;
    Ok(())
}
