use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use console_core::{
    load_settings,
    presentation::{display_name, preview_text},
    resolve_config_path, ConsoleSession, PatternStore, StaticPatternStore, SubmitError, ToggleOutcome,
};
use shared::domain::{ChatRole, PatternId};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pattern-console", about = "Chat with a model under a selected pattern")]
struct Args {
    /// TOML settings file (defaults to the per-user config directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read patterns from a JSON file instead of the remote store.
    #[arg(long)]
    patterns_file: Option<PathBuf>,
    /// Pattern id to select on startup.
    #[arg(long)]
    pattern: Option<i64>,
    /// Print the pattern list and exit.
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Patterns,
    Select(PatternId),
    Unselect(PatternId),
    Show(PatternId),
    Refresh,
    Reset,
    Help,
    Quit,
    Send(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum ParseError {
    #[error("unknown command '/{0}', try /help")]
    UnknownCommand(String),
    #[error("/{0} needs a pattern id")]
    MissingId(&'static str),
    #[error("'{0}' is not a pattern id")]
    InvalidId(String),
}

const HELP: &str = "\
commands:
  /patterns        list patterns ([x] marks the active one)
  /select N        make pattern N the active instruction
  /unselect N      clear pattern N if it is active
  /show N          print the full text of pattern N
  /refresh         refetch the pattern list
  /reset           start a new chat, keeping the pattern list
  /quit            exit
anything else is sent as a message";

/// Blank lines yield `None`.
fn parse_line(line: &str) -> Option<Result<Command, ParseError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Some(Ok(Command::Send(trimmed.to_string())));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    let with_id = |name: &'static str, build: fn(PatternId) -> Command| -> Result<Command, ParseError> {
        let raw = arg.ok_or(ParseError::MissingId(name))?;
        raw.parse::<i64>()
            .map(|id| build(PatternId(id)))
            .map_err(|_| ParseError::InvalidId(raw.to_string()))
    };

    Some(match name {
        "patterns" | "list" => Ok(Command::Patterns),
        "select" => with_id("select", Command::Select),
        "unselect" => with_id("unselect", Command::Unselect),
        "show" => with_id("show", Command::Show),
        "refresh" => Ok(Command::Refresh),
        "reset" | "new" => Ok(Command::Reset),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    })
}

fn print_patterns(session: &ConsoleSession) {
    let patterns = session.state().patterns();
    if patterns.is_empty() {
        println!("(no patterns loaded)");
        return;
    }
    for pattern in patterns {
        let mark = if session.is_checked(pattern.id) { "x" } else { " " };
        println!(
            "[{mark}] {:>3}  {}  {}",
            pattern.id,
            display_name(&pattern.file_name),
            preview_text(&pattern.pattern_text)
        );
    }
}

fn describe_toggle(session: &ConsoleSession, id: PatternId, outcome: ToggleOutcome) -> String {
    let name = session
        .state()
        .pattern(id)
        .map(|pattern| display_name(&pattern.file_name))
        .unwrap_or_else(|| id.to_string());
    match outcome {
        ToggleOutcome::Selected {
            displaced: Some(previous),
        } => format!("selected {name} (replacing pattern {previous})"),
        ToggleOutcome::Selected { displaced: None } => format!("selected {name}"),
        ToggleOutcome::Cleared => format!("cleared {name}"),
        ToggleOutcome::Ignored => format!("{name} is not the active pattern; nothing changed"),
    }
}

async fn refresh(session: &mut ConsoleSession) {
    match session.refresh_patterns().await {
        Ok(patterns) => println!("loaded {} patterns", patterns.len()),
        Err(err) => eprintln!("warning: {err}"),
    }
}

/// Returns `false` when the REPL should stop.
async fn run_command(session: &mut ConsoleSession, command: Command) -> bool {
    match command {
        Command::Patterns => print_patterns(session),
        Command::Select(id) => {
            let outcome = session.toggle_by_id(id, true);
            println!("{}", describe_toggle(session, id, outcome));
        }
        Command::Unselect(id) => {
            let outcome = session.toggle_by_id(id, false);
            println!("{}", describe_toggle(session, id, outcome));
        }
        Command::Show(id) => match session.state().pattern(id) {
            Some(pattern) => {
                println!("== {} ==", display_name(&pattern.file_name));
                println!("{}", pattern.pattern_text);
            }
            None => eprintln!("no pattern with id {id}"),
        },
        Command::Refresh => refresh(session).await,
        Command::Reset => {
            session.reset();
            println!("started a new chat");
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
        Command::Send(text) => match session.submit(&text).await {
            Ok(reply) => println!("{}> {reply}", ChatRole::Assistant.label()),
            Err(SubmitError::NoPatternSelected) => {
                eprintln!("Please select a pattern first. (/patterns, /select N)")
            }
            Err(SubmitError::CompletionFailed(err)) => {
                eprintln!("error: {err}");
                eprintln!("your message is kept in history; send it again to retry");
            }
        },
    }
    true
}

async fn build_session(args: &Args) -> Result<ConsoleSession> {
    let config_path = resolve_config_path(args.config.as_deref());
    let settings = load_settings(config_path.as_deref()).context("failed to load settings")?;
    info!(config = ?config_path, "settings loaded");

    let session = match &args.patterns_file {
        Some(path) => {
            let store = StaticPatternStore::from_json_file(path)
                .await
                .with_context(|| format!("failed to load patterns from {}", path.display()))?;
            let store: Arc<dyn PatternStore> = Arc::new(store);
            ConsoleSession::with_store(store, &settings)
        }
        None => ConsoleSession::from_settings(&settings),
    };
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut session = build_session(&args).await?;
    refresh(&mut session).await;

    if args.list {
        print_patterns(&session);
        return Ok(());
    }

    if let Some(id) = args.pattern {
        let id = PatternId(id);
        let outcome = session.toggle_by_id(id, true);
        if outcome == ToggleOutcome::Ignored {
            warn!(pattern_id = %id, "startup pattern not found");
        }
        println!("{}", describe_toggle(&session, id, outcome));
    }

    println!("type /help for commands");
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"user> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_line(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(err)) => {
                eprintln!("{err}");
                continue;
            }
        };
        if !run_command(&mut session, command).await {
            break;
        }
    }
    Ok(())
}
