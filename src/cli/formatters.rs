use chrono::NaiveDate;
use kitty_config::Config;
use kitty_core::{CurrencyFormatter, DateFormatter, GroupedCurrencyFormatter, IsoDateFormatter};

/// Formatters bound to the active configuration's currency and precision.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency: String,
    amounts: GroupedCurrencyFormatter,
    dates: IsoDateFormatter,
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency: config.currency.clone(),
            amounts: GroupedCurrencyFormatter {
                precision: config.precision(),
            },
            dates: IsoDateFormatter,
        }
    }

    /// Amount in the configured currency.
    pub fn money(&self, amount: f64) -> String {
        self.format_amount(amount, &self.currency)
    }

    /// Amount without the currency code, for table cells.
    pub fn number(&self, amount: f64) -> String {
        self.amounts.format_amount(amount, "")
    }

    pub fn date(&self, date: NaiveDate) -> String {
        self.format_date(date)
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let code = if currency.is_empty() {
            self.currency.as_str()
        } else {
            currency
        };
        self.amounts.format_amount(amount, code)
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        self.dates.format_date(date)
    }
}
