pub mod build_info;

use std::{env, path::PathBuf, sync::Once};

use dirs::home_dir;

const HOME_ENV: &str = "KITTY_HOME";
const DEFAULT_DIR_NAME: &str = ".kitty";
const HISTORY_FILE: &str = "history.txt";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. Logs go to stderr so script
/// output on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "kitty=info".parse() {
            filter = filter.add_directive(directive);
        }

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Application home, `KITTY_HOME` or `~/.kitty`.
pub fn app_home() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn history_file() -> PathBuf {
    app_home().join(HISTORY_FILE)
}
