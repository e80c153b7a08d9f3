//! Ledger entry commands: add, edit, remove and list.

use kitty_core::{validation, EntryDraft, LedgerAggregator};
use kitty_domain::{EntryKind, EntryPatch, LedgerEntry};

use crate::cli::args::{is_clear_token, parse_category, parse_window, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{CommandEntry, Subcommand, WINDOW_WORDS};
use crate::cli::ui::{short_id, signed, Table, TableColumn};

const ADD_FLAGS: &[&str] = &["date", "category", "company", "notes", "person"];
const EDIT_FLAGS: &[&str] = &[
    "date", "amount", "type", "category", "company", "notes", "person",
];
const LIST_FLAGS: &[&str] = &["person", "category"];

const SUBCOMMANDS: &[Subcommand] = &[
    Subcommand::new("add", entry_add)
        .arguments(&["income", "expense"])
        .flags(ADD_FLAGS),
    Subcommand::new("edit", entry_edit).flags(EDIT_FLAGS),
    Subcommand::new("remove", entry_remove),
    Subcommand::new("list", entry_list)
        .arguments(WINDOW_WORDS)
        .flags(LIST_FLAGS),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::with_subcommands(
        "entry",
        "Record, edit, remove or list income and expenses",
        "entry add <income|expense> <amount> [--date YYYY-MM-DD] [--category key] [--company name] [--notes text] [--person name]
entry edit <id> [--date ..] [--amount ..] [--type ..] [--category key|none] [--company ..] [--notes text|none] [--person ..]
entry remove <id>
entry list [all|month|year] [--person name] [--category key]",
        SUBCOMMANDS,
    )]
}


fn entry_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ADD_FLAGS)?;
    let (Some(kind), Some(amount)) = (parsed.positional(0), parsed.positional(1)) else {
        return Err(CommandError::InvalidArguments(
            "usage: entry add <income|expense> <amount> [--category key] ...".into(),
        ));
    };
    let kind = validation::parse_kind(kind)?;
    let amount = validation::parse_amount(amount)?;
    let date = match parsed.option("date") {
        Some(raw) => validation::parse_date(raw)?,
        None => context.session.today(),
    };
    let person = match parsed.option("person") {
        Some(name) => name.to_string(),
        None => context.session.person()?.to_string(),
    };

    let mut draft = EntryDraft::new(date, person, amount, kind);
    if let Some(raw) = parsed.option("category") {
        draft = draft.category(parse_category(raw)?);
    }
    if let Some(company) = parsed.option("company") {
        draft = draft.company(company);
    }
    if let Some(notes) = parsed.option("notes") {
        draft = draft.notes(notes);
    }

    let entry = context.session.add_entry(draft)?;
    io::print_success(format!(
        "Recorded {} of {} on {} ({}).",
        entry.kind,
        context.formatters.money(entry.amount),
        context.formatters.date(entry.date),
        short_id(entry.id)
    ));
    Ok(())
}

fn entry_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, EDIT_FLAGS)?;
    let Some(token) = parsed.positional(0) else {
        return Err(CommandError::InvalidArguments(
            "usage: entry edit <id> [--amount ..] ...".into(),
        ));
    };
    let id = context.session.resolve_entry(token)?;

    let mut patch = EntryPatch::default();
    if let Some(raw) = parsed.option("date") {
        patch.date = Some(validation::parse_date(raw)?);
    }
    if let Some(raw) = parsed.option("amount") {
        patch.amount = Some(validation::parse_amount(raw)?);
    }
    if let Some(raw) = parsed.option("type") {
        patch.kind = Some(validation::parse_kind(raw)?);
    }
    if let Some(raw) = parsed.option("category") {
        patch.category = Some(if is_clear_token(raw) {
            None
        } else {
            Some(parse_category(raw)?)
        });
    }
    if let Some(company) = parsed.option("company") {
        patch.company = Some(company.trim().to_string());
    }
    if let Some(raw) = parsed.option("notes") {
        patch.notes = Some((!is_clear_token(raw)).then(|| raw.trim().to_string()));
    }
    if let Some(person) = parsed.option("person") {
        patch.person = Some(person.trim().to_string());
    }

    let entry = context.session.update_entry(id, &patch)?;
    io::print_success(format!("Updated entry {}.", short_id(entry.id)));
    Ok(())
}

fn entry_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(token) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: entry remove <id>".into(),
        ));
    };
    let id = context.session.resolve_entry(token)?;
    if context.can_prompt()
        && !io::confirm_action(&context.theme, &format!("Remove entry {}?", short_id(id)), false)?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.session.remove_entry(id)?;
    io::print_success(format!("Removed entry {}.", short_id(id)));
    Ok(())
}

fn entry_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, LIST_FLAGS)?;
    let window = parse_window(parsed.positional(0), context.config.default_window)?;
    let category = parsed.option("category").map(parse_category).transpose()?;
    let person = parsed.option("person");

    let mut entries: Vec<&LedgerEntry> = LedgerAggregator::filter_window(
        &context.session.snapshot().entries,
        window,
        context.session.today(),
    )
    .into_iter()
    .filter(|entry| person.map_or(true, |name| entry.person.eq_ignore_ascii_case(name)))
    .filter(|entry| category.map_or(true, |category| entry.category == Some(category)))
    .collect();
    entries.sort_by_key(|entry| entry.date);

    if entries.is_empty() {
        io::print_info(format!("No entries ({window})."));
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Person").max(16),
        TableColumn::left("Type"),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::left("Company").max(20),
    ]);
    for entry in &entries {
        let amount = context.formatters.number(entry.amount);
        let amount = match entry.kind {
            EntryKind::Expense => signed(-entry.amount, amount),
            EntryKind::Income => amount,
        };
        table.add_row([
            short_id(entry.id),
            context.formatters.date(entry.date),
            entry.person.clone(),
            entry.kind.to_string(),
            entry.category_label().to_string(),
            amount,
            entry.company.clone(),
        ]);
    }
    table.print();
    io::print_info(format!("{} entries ({window}).", entries.len()));
    Ok(())
}
