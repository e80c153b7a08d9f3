//! Read-only dashboard views computed from the session snapshot.

use kitty_core::{validation, AggregateResult};
use kitty_domain::TimeWindow;

use crate::cli::args::{parse_window, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, WINDOW_WORDS};
use crate::cli::ui::{signed, Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Income, expense and net totals",
            "summary [all|month|year]
summary <month> <year>",
            cmd_summary,
        )
        .arguments(WINDOW_WORDS),
        CommandEntry::new(
            "people",
            "Spent, saved and net worth per member",
            "people [all|month|year]",
            cmd_people,
        )
        .arguments(WINDOW_WORDS),
        CommandEntry::new(
            "categories",
            "Expense totals per category",
            "categories [all|month|year]",
            cmd_categories,
        )
        .arguments(WINDOW_WORDS),
        CommandEntry::new(
            "series",
            "Daily net and running balance per member",
            "series [all|month|year] [--person name]",
            cmd_series,
        )
        .arguments(WINDOW_WORDS)
        .flags(&["person"]),
        CommandEntry::new(
            "months",
            "Income and expenses per calendar month",
            "months [all|month|year]",
            cmd_months,
        )
        .arguments(WINDOW_WORDS),
    ]
}

/// Window from the first argument, falling back to the configured default.
fn window_result(
    context: &ShellContext,
    raw: Option<&str>,
) -> Result<(TimeWindow, AggregateResult), CommandError> {
    let window = parse_window(raw, context.config.default_window)?;
    Ok((window, context.session.summary(window)))
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (title, result) = match args {
        [month, year] => {
            let period = validation::parse_period(month, year)?;
            (period.to_string(), context.session.month_summary(period))
        }
        [] | [_] => {
            let (window, result) = window_result(context, args.first().copied())?;
            (window.to_string(), result)
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: summary [all|month|year] | summary <month> <year>".into(),
            ))
        }
    };

    let money = |amount: f64| context.formatters.money(amount);
    output_section(format!("Summary ({title})"));
    io::print_info(format!("  Entries  : {}", result.entry_count));
    io::print_info(format!("  Income   : {}", money(result.total_income)));
    io::print_info(format!("  Expenses : {}", money(result.total_expense)));
    io::print_info(format!(
        "  Net      : {}",
        signed(result.net, money(result.net))
    ));
    Ok(())
}

fn cmd_people(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (window, result) = window_result(context, args.first().copied())?;
    output_section(format!("People ({window})"));
    if result.by_person.is_empty() {
        io::print_info("No entries in this window.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Person").max(20),
        TableColumn::right("Spent"),
        TableColumn::right("Saved"),
        TableColumn::right("Net worth"),
    ]);
    for person in &result.by_person {
        let net = person.net_worth();
        table.add_row([
            person.person.clone(),
            context.formatters.number(person.spent),
            context.formatters.number(person.saved),
            signed(net, context.formatters.number(net)),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (window, result) = window_result(context, args.first().copied())?;
    output_section(format!("Categories ({window})"));
    if result.by_category.is_empty() {
        io::print_info("No categorised expenses in this window.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Spent"),
        TableColumn::right("Share"),
    ]);
    for total in &result.by_category {
        let share = if result.total_expense > 0.0 {
            total.amount / result.total_expense * 100.0
        } else {
            0.0
        };
        table.add_row([
            total.category.label().to_string(),
            context.formatters.number(total.amount),
            format!("{share:.1}%"),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_series(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["person"])?;
    let (window, result) = window_result(context, parsed.positional(0))?;
    output_section(format!("Series ({window})"));
    if result.is_empty() {
        io::print_info("No entries in this window.");
        return Ok(());
    }

    if let Some(name) = parsed.option("person") {
        let series = result
            .cumulative
            .iter()
            .find(|series| series.person.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no entries for `{name}` in this window"))
            })?;
        let mut table = Table::new(vec![
            TableColumn::left("Date"),
            TableColumn::right("Daily"),
            TableColumn::right("Balance"),
        ]);
        for point in &series.points {
            table.add_row([
                context.formatters.date(point.date),
                signed(point.daily, context.formatters.number(point.daily)),
                signed(point.cumulative, context.formatters.number(point.cumulative)),
            ]);
        }
        table.print();
        return Ok(());
    }

    let mut columns = vec![TableColumn::left("Date")];
    columns.extend(
        result
            .cumulative
            .iter()
            .map(|series| TableColumn::right(series.person.clone()).max(14)),
    );
    let mut table = Table::new(columns);
    for (idx, date) in result.dates().into_iter().enumerate() {
        let mut row = vec![context.formatters.date(date)];
        row.extend(result.cumulative.iter().map(|series| {
            let balance = series.points.get(idx).map_or(0.0, |point| point.cumulative);
            signed(balance, context.formatters.number(balance))
        }));
        table.add_row(row);
    }
    table.print();
    Ok(())
}

fn cmd_months(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (window, result) = window_result(context, args.first().copied())?;
    output_section(format!("Months ({window})"));
    if result.by_month.is_empty() {
        io::print_info("No entries in this window.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Expenses"),
        TableColumn::right("Net"),
        TableColumn::right("Entries"),
    ]);
    for month in &result.by_month {
        let net = month.net();
        table.add_row([
            month.month.to_string(),
            context.formatters.number(month.income),
            context.formatters.number(month.expense),
            signed(net, context.formatters.number(net)),
            month.entry_count.to_string(),
        ]);
    }
    table.print();
    Ok(())
}
