mod input;
mod render;
mod telemetry;

use std::fmt;
use std::io::Write;

use services::{AppServices, ContentSource, SessionController, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::input::Input;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
    InvalidContent { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidContent { raw } => write!(f, "invalid --content value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    content: ContentSource,
    db_url: String,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [study]  [--content <path|url>] [--db <sqlite_url>] [--seed <n>]");
    eprintln!("  app progress [--content <path|url>] [--db <sqlite_url>]");
    eprintln!("  app reset    [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --content data.json");
    eprintln!("  --db sqlite://progress.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_CONTENT, STUDY_DB_URL, STUDY_SEED, STUDY_LOG, STUDY_LOG_FORMAT");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Study,
    Progress,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "study" => Some(Self::Study),
            "progress" => Some(Self::Progress),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut content = std::env::var("STUDY_CONTENT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| ContentSource::parse("data.json"), |raw| {
                ContentSource::parse(&raw)
            });
        let mut db_url = std::env::var("STUDY_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://progress.sqlite3".into(), normalize_sqlite_url);
        let mut seed = std::env::var("STUDY_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--content" => {
                    let value = require_value(args, "--content")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidContent { raw: value });
                    }
                    content = ContentSource::parse(&value);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            content,
            db_url,
            seed,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
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

    let path = std::path::Path::new(path);
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

fn show(controller: &SessionController) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    match controller.view() {
        Ok(view) => render::render_view(&mut out, &view),
        Err(_) => render::render_failure(
            &mut out,
            controller.failure().unwrap_or("content unavailable"),
        ),
    }
}

fn prompt() -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "> ")?;
    out.flush()
}

async fn study(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = services.start_session().await;
    show(&controller)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match input::parse_line(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => println!("{}", input::HELP),
            Ok(Input::Show) => show(&controller)?,
            Ok(Input::Reload) => {
                info!(source = %services.source(), "reloading study content");
                services.reload_session(&mut controller).await;
                show(&controller)?;
            }
            Ok(Input::Command(command)) => match controller.dispatch(command).await {
                Ok(dispatched) => {
                    debug!(?command, outcome = ?dispatched.outcome, "command applied");
                    if let Some(notice) = render::outcome_notice(&dispatched.outcome) {
                        println!("{notice}");
                    }
                    if !dispatched.persisted {
                        println!("(progress could not be saved; it is kept for this session)");
                    }
                    render::render_view(&mut std::io::stdout().lock(), &dispatched.view)?;
                }
                Err(SessionError::NotLoaded { reason }) => {
                    render::render_failure(&mut std::io::stdout().lock(), &reason)?;
                }
            },
            Err(err) => println!("{err}"),
        }
    }

    if let Some(snapshot) = controller.finish() {
        println!("Progress: {}", render::progress_line(&snapshot));
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means study.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Study,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Study,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, parsed.content, parsed.seed).await?;
    info!(db = %parsed.db_url, source = %services.source(), "storage ready");

    match cmd {
        Command::Study => study(&services).await,
        Command::Progress => {
            let snapshot = services.stored_progress().await?;
            println!("{}", render::progress_line(&snapshot));
            Ok(())
        }
        Command::Reset => {
            services.reset_progress().await?;
            println!("Progress cleared.");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--content",
            "https://example.org/data.json",
            "--db",
            "sqlite::memory:",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(
            args.content,
            ContentSource::Url("https://example.org/data.json".into())
        );
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn bad_seed_is_rejected() {
        assert!(matches!(
            parse(&["--seed", "soon"]),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--verbose"]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn relative_db_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:progress.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("progress.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
    }

    #[test]
    fn subcommands_parse() {
        assert_eq!(Command::from_arg("study"), Some(Command::Study));
        assert_eq!(Command::from_arg("reset"), Some(Command::Reset));
        assert_eq!(Command::from_arg("ui"), None);
    }
}
