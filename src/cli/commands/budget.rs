//! Monthly budgets and their reconciliation against actual spend.

use kitty_core::{validation, BudgetDraft, BudgetWrite, ReconcileResult, Reconciliation};
use kitty_domain::{Category, MonthKey};

use crate::cli::args::ParsedArgs;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, Subcommand};
use crate::cli::ui::{signed, status_label, Table, TableColumn};

const SUBCOMMANDS: &[Subcommand] = &[
    Subcommand::new("show", budget_show),
    Subcommand::new("set", budget_set).category_flags(),
    Subcommand::new("list", budget_list),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::with_subcommands(
        "budget",
        "Plan a month and compare it with actual spend",
        "budget show [<month> <year>]
budget set <month> <year> [expected-income] [--<category> amount ...]
budget list",
        SUBCOMMANDS,
    )
    .default_subcommand("show")]
}


fn period_arg(context: &ShellContext, args: &[&str]) -> Result<MonthKey, CommandError> {
    match args {
        [] => Ok(context.session.current_period()),
        [month, year] => Ok(validation::parse_period(month, year)?),
        _ => Err(CommandError::InvalidArguments(
            "expected <month> <year>, e.g. `1 2024`".into(),
        )),
    }
}

fn budget_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = period_arg(context, args)?;
    match context.session.reconcile(period) {
        Reconciliation::NoBudget => {
            io::print_warning(format!("No budget for {period}."));
            io::print_hint(format!(
                "Use `budget set {} {} <expected-income> --food <amount>` to create one.",
                period.month, period.year
            ));
        }
        Reconciliation::Reconciled(result) => print_reconciliation(context, &result),
    }
    Ok(())
}

fn print_reconciliation(context: &ShellContext, result: &ReconcileResult) {
    let money = |amount: f64| context.formatters.money(amount);
    output_section(format!("Budget {}", result.period));
    io::print_info(format!("  Expected income  : {}", money(result.expected_income)));

    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Budgeted"),
        TableColumn::right("Actual"),
        TableColumn::right("Remaining"),
        TableColumn::left("Status"),
    ]);
    for line in result
        .lines
        .iter()
        .filter(|line| line.budgeted != 0.0 || line.actual != 0.0)
    {
        table.add_row([
            line.category.label().to_string(),
            context.formatters.number(line.budgeted),
            context.formatters.number(line.actual),
            signed(line.remaining, context.formatters.number(line.remaining)),
            status_label(line.status),
        ]);
    }
    if table.is_empty() {
        io::print_info("  No allocations or categorised spend this month.");
    } else {
        table.print();
    }

    io::print_info(format!("  Total budgeted   : {}", money(result.total_budgeted)));
    io::print_info(format!("  Total actual     : {}", money(result.total_actual)));
    io::print_info(format!("  Expected savings : {}", money(result.expected_savings)));
    io::print_info(format!("  Actual income    : {}", money(result.actual_income)));
    io::print_info(format!("  Actual expenses  : {}", money(result.actual_expense)));
    io::print_info(format!(
        "  Actual savings   : {}",
        signed(result.actual_savings, money(result.actual_savings))
    ));
    io::print_info(format!(
        "  Net profit/loss  : {}",
        signed(result.net_profit_loss, money(result.net_profit_loss))
    ));
}

fn budget_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let flags: Vec<&'static str> = Category::ALL.iter().map(|category| category.key()).collect();
    let parsed = ParsedArgs::parse(args, &flags)?;
    let (Some(month), Some(year)) = (parsed.positional(0), parsed.positional(1)) else {
        return Err(CommandError::InvalidArguments(
            "usage: budget set <month> <year> [expected-income] [--<category> amount ...]".into(),
        ));
    };
    let period = validation::parse_period(month, year)?;
    let existing = context.session.snapshot().budget_for(period).cloned();

    let expected_income = match (parsed.positional(2), &existing) {
        (Some(raw), _) => validation::parse_amount(raw)?,
        (None, Some(budget)) => budget.expected_income,
        (None, None) => {
            return Err(CommandError::InvalidArguments(format!(
                "expected income is required for a new budget ({period})"
            )))
        }
    };

    // Categories not named on the command line keep their current allocation.
    let mut draft = BudgetDraft::new(period, expected_income);
    if let Some(budget) = &existing {
        for (category, amount) in budget.categories.iter() {
            draft = draft.allocate(category, amount);
        }
    }
    for category in Category::ALL {
        if let Some(raw) = parsed.option(category.key()) {
            draft = draft.allocate(category, validation::parse_amount(raw)?);
        }
    }

    let (budget, write) = context.session.save_budget(&draft)?;
    let verb = match write {
        BudgetWrite::Created => "Created",
        BudgetWrite::Updated => "Updated",
    };
    io::print_success(format!(
        "{verb} budget for {}: expected savings {}.",
        budget.period(),
        context.formatters.money(budget.expected_savings)
    ));
    Ok(())
}

fn budget_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let budgets = &context.session.snapshot().budgets;
    if budgets.is_empty() {
        io::print_info("No budgets yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Period"),
        TableColumn::right("Expected income"),
        TableColumn::right("Allocated"),
        TableColumn::right("Expected savings"),
    ]);
    for budget in budgets {
        table.add_row([
            budget.period().to_string(),
            context.formatters.number(budget.expected_income),
            context.formatters.number(budget.total_allocated()),
            signed(
                budget.expected_savings,
                context.formatters.number(budget.expected_savings),
            ),
        ]);
    }
    table.print();
    Ok(())
}
