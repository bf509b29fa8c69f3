use std::fmt;
use std::path::{Path, PathBuf};

use services::QuizSettings;

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const DB_URL_ENV: &str = "QUIZ_DB_URL";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    Stats,
    Leaderboard,
    Name(String),
    Reset { confirmed: bool },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: String,
    pub command: Command,
    pub settings: QuizSettings,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [play] [--db <sqlite_url>] [--shuffle] [--shuffle-options]");
    eprintln!("              [--no-timer] [--no-explanations]");
    eprintln!("  quiz stats        [--db <sqlite_url>]");
    eprintln!("  quiz leaderboard  [--db <sqlite_url>]");
    eprintln!("  quiz name <NAME>  [--db <sqlite_url>]");
    eprintln!("  quiz reset --yes  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {DB_URL_ENV}, RUST_LOG (default: warn)");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Config {
    /// Parse arguments (without the program name). `env_db_url` is the
    /// value of `QUIZ_DB_URL`, if set.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut args = args.into_iter().peekable();
        let mut db_url = env_db_url
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut settings = QuizSettings::default();
        let mut help = false;

        let mut command = match args.peek().map(String::as_str) {
            None => Command::Play,
            Some(first) if first.starts_with('-') => Command::Play,
            Some(_) => {
                let first = args.next().unwrap_or_default();
                match first.as_str() {
                    "play" => Command::Play,
                    "stats" => Command::Stats,
                    "leaderboard" => Command::Leaderboard,
                    "name" => Command::Name(require_value(&mut args, "name")?),
                    "reset" => Command::Reset { confirmed: false },
                    "help" => Command::Help,
                    _ => return Err(ArgsError::UnknownCommand(first)),
                }
            }
        };

        while let Some(arg) = args.next() {
            match (arg.as_str(), &mut command) {
                ("--db", _) => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                ("--help" | "-h", _) => help = true,
                ("--yes" | "-y", Command::Reset { confirmed }) => *confirmed = true,
                ("--shuffle", Command::Play) => settings.shuffle_questions = true,
                ("--shuffle-options", Command::Play) => settings.shuffle_options = true,
                ("--no-timer", Command::Play) => settings.show_timer = false,
                ("--no-explanations", Command::Play) => settings.show_explanation = false,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if help {
            command = Command::Help;
        }

        Ok(Self {
            db_url,
            command,
            settings,
        })
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file (and its directory) so `SQLite` can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite::memory:?") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
