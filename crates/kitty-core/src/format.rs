use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// `USD 1,234.50` style output with thousands separators.
#[derive(Debug, Clone, Copy)]
pub struct GroupedCurrencyFormatter {
    pub precision: usize,
}

impl Default for GroupedCurrencyFormatter {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl CurrencyFormatter for GroupedCurrencyFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let raw = format!("{:.*}", self.precision, amount.abs());
        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole.to_string(), Some(fraction.to_string())),
            None => (raw.clone(), None),
        };
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (index, digit) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        let number = match fraction {
            Some(fraction) => format!("{grouped}.{fraction}"),
            None => grouped,
        };
        if currency.is_empty() {
            format!("{sign}{number}")
        } else {
            format!("{sign}{currency} {number}")
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IsoDateFormatter;

impl DateFormatter for IsoDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}
