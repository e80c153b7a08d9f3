//! Sign-in, group membership and snapshot refresh.

use kitty_domain::GroupId;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, Subcommand};

const GROUP_SUBCOMMANDS: &[Subcommand] = &[
    Subcommand::new("show", group_show),
    Subcommand::new("switch", group_switch),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Sign in with a display name",
            "login <name>",
            cmd_login,
        ),
        CommandEntry::new("logout", "Sign out", "logout", cmd_logout),
        CommandEntry::new(
            "whoami",
            "Show the signed-in member and group",
            "whoami",
            cmd_whoami,
        ),
        CommandEntry::with_subcommands(
            "group",
            "Show or switch the active group",
            "group [show|switch <group-id>]",
            GROUP_SUBCOMMANDS,
        )
        .default_subcommand("show"),
        CommandEntry::new(
            "refresh",
            "Reload entries, budgets and goals for the active group",
            "refresh",
            cmd_refresh,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments("usage: login <name>".into()));
    }
    context.session.sign_in(&name)?;
    context.persist_profile()?;
    let person = context.session.person()?.to_string();
    io::print_success(format!(
        "Signed in as {person} (group {}).",
        context.session.group()
    ));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.session.profile().signed_in() {
        io::print_info("Not signed in.");
        return Ok(());
    }
    context.session.sign_out();
    context.persist_profile()?;
    io::print_success("Signed out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let group = context.session.group();
    match context.session.profile().person() {
        Some(person) => io::print_info(format!("Signed in as {person} (group {group}).")),
        None => io::print_info(format!("Not signed in (group {group}).")),
    }
    Ok(())
}


fn group_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.session.snapshot();
    output_section(format!("Group {}", context.session.group()));
    io::print_info(format!("  Entries : {}", snapshot.entries.len()));
    io::print_info(format!("  Budgets : {}", snapshot.budgets.len()));
    io::print_info(format!("  Goals   : {}", snapshot.goals.len()));
    let fetched = snapshot
        .fetched_at
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".into());
    io::print_info(format!("  Loaded  : {fetched}"));
    Ok(())
}

fn group_switch(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first().filter(|raw| !raw.trim().is_empty()) else {
        return Err(CommandError::InvalidArguments(
            "usage: group switch <group-id>".into(),
        ));
    };
    let group = GroupId::new(*raw);
    if &group == context.session.group() {
        io::print_info(format!("Already in group {group}."));
        return Ok(());
    }
    let loaded = context.session.switch_group(group);
    context.persist_profile()?;
    loaded?;
    io::print_success(format!(
        "Switched to group {} ({} entries).",
        context.session.group(),
        context.session.snapshot().entries.len()
    ));
    Ok(())
}

fn cmd_refresh(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.refresh()?;
    let snapshot = context.session.snapshot();
    io::print_success(format!(
        "Loaded {} entries, {} budgets and {} goals.",
        snapshot.entries.len(),
        snapshot.budgets.len(),
        snapshot.goals.len()
    ));
    Ok(())
}
