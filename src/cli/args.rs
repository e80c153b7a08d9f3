//! Splits command arguments into positionals and `--flag value` options.

use std::collections::HashMap;

use strsim::levenshtein;

use kitty_core::validation;
use kitty_domain::{Category, TimeWindow};

use crate::cli::core::CommandError;

#[derive(Debug, Default)]
pub struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    options: HashMap<&'static str, &'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// Every `--name` must appear in `flags` and be followed by a value.
    pub fn parse(args: &[&'a str], flags: &[&'static str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            let flag = flags
                .iter()
                .copied()
                .find(|flag| flag.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "unknown option `--{name}` (expected {})",
                        flags
                            .iter()
                            .map(|flag| format!("--{flag}"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?;
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`--{flag}` needs a value"))
            })?;
            parsed.options.insert(flag, value);
        }
        Ok(parsed)
    }

    pub fn positional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    pub fn positionals(&self) -> &[&'a str] {
        &self.positional
    }

    pub fn option(&self, flag: &str) -> Option<&'a str> {
        self.options.get(flag).copied()
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Parses a category, suggesting the closest catalog key on failure.
pub fn parse_category(raw: &str) -> Result<Category, CommandError> {
    if let Ok(category) = validation::parse_category(raw) {
        return Ok(category);
    }
    let needle = raw.trim().to_ascii_lowercase();
    let closest = Category::ALL
        .iter()
        .map(|category| (levenshtein(category.key(), &needle), category.key()))
        .min_by_key(|(distance, _)| *distance);
    let mut message = format!("unknown category `{}`", raw.trim());
    if let Some((distance, key)) = closest {
        if distance <= 3 {
            message.push_str(&format!(" (did you mean `{key}`?)"));
        }
    }
    Err(CommandError::InvalidArguments(message))
}

/// `none` (or an empty string) clears an optional value.
pub fn is_clear_token(raw: &str) -> bool {
    raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("none")
}

pub fn parse_window(raw: Option<&str>, fallback: TimeWindow) -> Result<TimeWindow, CommandError> {
    match raw {
        Some(raw) => raw.parse().map_err(CommandError::InvalidArguments),
        None => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_flags_from_positionals() {
        let args = ["expense", "42", "--category", "food", "--notes", "weekly shop"];
        let parsed = ParsedArgs::parse(&args, &["category", "notes"]).unwrap();
        assert_eq!(parsed.positionals(), &["expense", "42"]);
        assert_eq!(parsed.option("category"), Some("food"));
        assert_eq!(parsed.option("notes"), Some("weekly shop"));
    }

    #[test]
    fn rejects_unknown_and_dangling_flags() {
        assert!(ParsedArgs::parse(&["--colour", "red"], &["category"]).is_err());
        assert!(ParsedArgs::parse(&["--category"], &["category"]).is_err());
    }

    #[test]
    fn category_errors_suggest_closest_key() {
        let err = parse_category("fod").unwrap_err().to_string();
        assert!(err.contains("did you mean `food`"), "{err}");
        assert_eq!(parse_category("Debt Payments").unwrap(), Category::Debt);
    }
}
