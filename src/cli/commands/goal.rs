use kitty_core::{validation, GoalDraft};
use kitty_domain::GoalPatch;

use crate::cli::args::ParsedArgs;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, Subcommand};
use crate::cli::ui::{short_id, Table, TableColumn};

const SUBCOMMANDS: &[Subcommand] = &[
    Subcommand::new("add", goal_add),
    Subcommand::new("edit", goal_edit).flags(&["name", "target"]),
    Subcommand::new("remove", goal_remove),
    Subcommand::new("list", goal_list),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::with_subcommands(
        "goal",
        "Shared savings goals and their progress",
        "goal add <name> <target>
goal edit <id> [--name text] [--target amount]
goal remove <id>
goal list",
        SUBCOMMANDS,
    )
    .default_subcommand("list")]
}


fn goal_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((target, name)) = args.split_last().filter(|(_, name)| !name.is_empty()) else {
        return Err(CommandError::InvalidArguments(
            "usage: goal add <name> <target>".into(),
        ));
    };
    let target = validation::parse_positive_amount(target)?;
    let goal = context
        .session
        .add_goal(&GoalDraft::new(name.join(" "), target))?;
    io::print_success(format!(
        "Added goal `{}` targeting {} ({}).",
        goal.name,
        context.formatters.money(goal.target),
        short_id(goal.id)
    ));
    Ok(())
}

fn goal_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["name", "target"])?;
    let Some(token) = parsed.positional(0) else {
        return Err(CommandError::InvalidArguments(
            "usage: goal edit <id> [--name text] [--target amount]".into(),
        ));
    };
    let id = context.session.resolve_goal(token)?;
    let patch = GoalPatch {
        name: parsed.option("name").map(str::to_string),
        target: parsed
            .option("target")
            .map(validation::parse_positive_amount)
            .transpose()?,
    };
    let goal = context.session.update_goal(id, &patch)?;
    io::print_success(format!(
        "Updated goal `{}` ({}).",
        goal.name,
        context.formatters.money(goal.target)
    ));
    Ok(())
}

fn goal_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(token) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: goal remove <id>".into()));
    };
    let id = context.session.resolve_goal(token)?;
    if context.can_prompt()
        && !io::confirm_action(&context.theme, &format!("Remove goal {}?", short_id(id)), false)?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.session.remove_goal(id)?;
    io::print_success(format!("Removed goal {}.", short_id(id)));
    Ok(())
}

fn goal_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let progress = context.session.goal_progress();
    output_section("Goals");
    if progress.is_empty() {
        io::print_info("No goals yet. Use `goal add <name> <target>`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Name").max(24),
        TableColumn::right("Target"),
        TableColumn::right("Saved"),
        TableColumn::right("Progress"),
        TableColumn::right("Remaining"),
    ]);
    for goal in &progress {
        let percent = if goal.reached() {
            "reached".to_string()
        } else {
            format!("{:.0}%", goal.percent())
        };
        table.add_row([
            short_id(goal.goal_id),
            goal.name.clone(),
            context.formatters.number(goal.target),
            context.formatters.number(goal.saved),
            percent,
            context.formatters.number(goal.remaining()),
        ]);
    }
    table.print();
    Ok(())
}
