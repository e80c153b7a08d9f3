//! Shell command table: routing, help text and completion metadata.

use kitty_domain::Category;

use crate::cli::core::{CommandError, CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Window words accepted by the dashboard and `entry list`.
pub const WINDOW_WORDS: &[&str] = &["all", "month", "year"];

/// One `<command> <name>` route.
#[derive(Clone, Copy)]
pub struct Subcommand {
    pub name: &'static str,
    pub handler: CommandHandler,
    /// Words completed right after the subcommand name.
    pub arguments: &'static [&'static str],
    pub flags: &'static [&'static str],
    /// Accepts one `--<category>` flag per catalog entry (`budget set`).
    pub category_flags: bool,
}

impl Subcommand {
    pub const fn new(name: &'static str, handler: CommandHandler) -> Self {
        Self {
            name,
            handler,
            arguments: &[],
            flags: &[],
            category_flags: false,
        }
    }

    pub const fn arguments(self, arguments: &'static [&'static str]) -> Self {
        Self { arguments, ..self }
    }

    pub const fn flags(self, flags: &'static [&'static str]) -> Self {
        Self { flags, ..self }
    }

    pub const fn category_flags(self) -> Self {
        Self {
            category_flags: true,
            ..self
        }
    }
}

#[derive(Clone, Copy)]
pub enum Route {
    Handler(CommandHandler),
    Subcommands {
        table: &'static [Subcommand],
        /// Runs when no subcommand is given.
        default: Option<&'static str>,
    },
}

#[derive(Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub route: Route,
    /// Completion words for a plain handler's first argument.
    pub arguments: &'static [&'static str],
    pub flags: &'static [&'static str],
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            route: Route::Handler(handler),
            arguments: &[],
            flags: &[],
        }
    }

    pub const fn with_subcommands(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        table: &'static [Subcommand],
    ) -> Self {
        Self {
            name,
            description,
            usage,
            route: Route::Subcommands {
                table,
                default: None,
            },
            arguments: &[],
            flags: &[],
        }
    }

    pub const fn default_subcommand(self, name: &'static str) -> Self {
        let route = match self.route {
            Route::Subcommands { table, .. } => Route::Subcommands {
                table,
                default: Some(name),
            },
            handler => handler,
        };
        Self { route, ..self }
    }

    pub const fn arguments(self, arguments: &'static [&'static str]) -> Self {
        Self { arguments, ..self }
    }

    pub const fn flags(self, flags: &'static [&'static str]) -> Self {
        Self { flags, ..self }
    }

    pub fn subcommands(&self) -> &'static [Subcommand] {
        match self.route {
            Route::Subcommands { table, .. } => table,
            Route::Handler(_) => &[],
        }
    }

    fn subcommand(&self, word: &str) -> Option<&'static Subcommand> {
        self.subcommands()
            .iter()
            .find(|sub| sub.name.eq_ignore_ascii_case(word))
    }

    fn subcommand_list(&self, separator: &str) -> String {
        self.subcommands()
            .iter()
            .map(|sub| sub.name)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Picks the handler for `args` and how many leading words it consumed.
    fn resolve(&self, args: &[&str]) -> Result<(CommandHandler, usize), CommandError> {
        let (table, default) = match self.route {
            Route::Handler(handler) => return Ok((handler, 0)),
            Route::Subcommands { table, default } => (table, default),
        };
        let Some(word) = args.first() else {
            return default
                .and_then(|name| table.iter().find(|sub| sub.name == name))
                .map(|sub| (sub.handler, 0))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "usage: {} <{}>",
                        self.name,
                        self.subcommand_list("|")
                    ))
                });
        };
        self.subcommand(word)
            .map(|sub| (sub.handler, 1))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown {} subcommand `{word}`. Available: {}",
                    self.name,
                    self.subcommand_list(", ")
                ))
            })
    }

    /// Candidates for `partial`, given the complete words typed after the name.
    fn candidates(&self, words: &[&str], partial: &str) -> Vec<String> {
        let (arguments, flags, category_flags, positionals) = match words.first() {
            Some(word) if !self.subcommands().is_empty() => match self.subcommand(word) {
                Some(sub) => (sub.arguments, sub.flags, sub.category_flags, &words[1..]),
                None => return Vec::new(),
            },
            None if !self.subcommands().is_empty() => {
                return matching(self.subcommands().iter().map(|sub| sub.name), partial)
            }
            _ => (self.arguments, self.flags, false, words),
        };

        if let Some(previous) = words.last() {
            if previous.eq_ignore_ascii_case("--category") {
                return matching(Category::ALL.iter().map(|category| category.key()), partial);
            }
            if previous.starts_with("--") {
                return Vec::new();
            }
        }
        if partial.starts_with("--") {
            let category_keys = Category::ALL
                .iter()
                .filter(|_| category_flags)
                .map(|category| category.key());
            let options: Vec<String> = flags
                .iter()
                .copied()
                .chain(category_keys)
                .map(|flag| format!("--{flag}"))
                .collect();
            return matching(options.iter().map(String::as_str), partial);
        }
        if positionals.is_empty() {
            return matching(arguments.iter().copied(), partial);
        }
        Vec::new()
    }

    /// Remaining usage text once `words` (name included) have been typed.
    fn usage_hint(&self, words: &[&str]) -> Option<String> {
        if words.len() == 1 && !self.subcommands().is_empty() {
            return Some(format!("<{}>", self.subcommand_list("|")));
        }
        let typed = words.join(" ").to_ascii_lowercase();
        self.usage.lines().map(str::trim).find_map(|line| {
            let rest = line.strip_prefix(typed.as_str())?;
            rest.starts_with(' ')
                .then(|| rest.trim_start().to_string())
                .filter(|rest| !rest.is_empty())
        })
    }
}

fn matching<'a>(options: impl Iterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let needle = partial.to_ascii_lowercase();
    options
        .filter(|option| option.starts_with(&needle))
        .map(str::to_string)
        .collect()
}

/// Commands in registration order.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A later registration under the same name replaces the earlier one.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|existing| existing.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// `None` for an unknown command, otherwise the handler and the words
    /// left for it.
    pub fn resolve<'a, 'b>(
        &self,
        name: &str,
        args: &'b [&'a str],
    ) -> Option<Result<(CommandHandler, &'b [&'a str]), CommandError>> {
        let entry = self.get(name)?;
        Some(
            entry
                .resolve(args)
                .map(|(handler, consumed)| (handler, &args[consumed..])),
        )
    }

    /// Start offset of the word under the cursor and its completions.
    pub fn complete(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let partial = &prefix[start..];
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let candidates = match words.split_first() {
            None => matching(self.names(), partial),
            Some((name, rest)) => self
                .get(&name.to_ascii_lowercase())
                .map(|entry| entry.candidates(rest, partial))
                .unwrap_or_default(),
        };
        (start, candidates)
    }

    /// Usage text for what remains once the line ends in a space.
    pub fn hint(&self, line: &str) -> Option<String> {
        if !line.ends_with(char::is_whitespace) {
            return None;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let entry = self.get(&words.first()?.to_ascii_lowercase())?;
        if words.len() > 2 {
            return None;
        }
        entry.usage_hint(&words)
    }
}
