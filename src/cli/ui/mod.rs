pub mod table;

use colored::Colorize;
use kitty_core::BudgetStatus;

pub use table::{Alignment, Table, TableColumn};

/// Status label coloured red, yellow or green.
pub fn status_label(status: BudgetStatus) -> String {
    let label = status.to_string();
    match status {
        BudgetStatus::Over => label.red().bold().to_string(),
        BudgetStatus::Warning => label.yellow().to_string(),
        BudgetStatus::Ok => label.green().to_string(),
    }
}

/// Negative amounts in red.
pub fn signed(amount: f64, text: String) -> String {
    if amount < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// Eight-character id prefix shown in listings.
pub fn short_id(id: uuid::Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}
