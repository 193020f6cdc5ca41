//! Zuri - natural-language file assistant.
//!
//! Front end wiring for the zuri_core pipeline: CLI parsing, tracing
//! setup, the interactive loop, and the stdin destination picker.
//! Each submitted command runs on its own blocking worker task so the
//! interactive surface stays responsive.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use zuri_core::dispatch::DestinationPicker;
use zuri_core::history::HistoryDb;
use zuri_core::{Dispatcher, ZuriConfig};

#[derive(Parser)]
#[command(name = "zuri")]
#[command(about = "Zuri - natural-language file assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file path (defaults to ~/.config/zuri/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History database path (defaults to the user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single command and exit
    Run {
        /// The command text, e.g. "open resume.pdf"
        text: Vec<String>,

        /// Emit the result as JSON instead of a plain message
        #[arg(long)]
        json: bool,
    },

    /// Show recent command history
    History {
        /// Maximum number of entries to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Print the active config file path
    ConfigPath,
}

/// Destination picker over stdin; an empty line cancels.
struct StdinPicker;

impl DestinationPicker for StdinPicker {
    fn pick_directory(&self, purpose: &str) -> Option<PathBuf> {
        print!("Destination directory for {} (empty line cancels): ", purpose);
        io::stdout().flush().ok()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line).ok()?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(PathBuf::from(trimmed))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ZuriConfig::load_from(path)?,
        None => ZuriConfig::load(),
    };

    match cli.command {
        Some(Commands::Run { text, json }) => {
            let dispatcher = build_dispatcher(&config, &cli.db)?;
            run_once(dispatcher, text.join(" "), json).await
        }
        Some(Commands::History { limit }) => show_history(&cli.db, &config, limit),
        Some(Commands::ConfigPath) => {
            match ZuriConfig::user_config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("(no config directory available)"),
            }
            Ok(())
        }
        None => {
            let dispatcher = build_dispatcher(&config, &cli.db)?;
            repl(dispatcher).await
        }
    }
}

fn open_history(cli_db: &Option<PathBuf>, config: &ZuriConfig) -> Result<HistoryDb> {
    match cli_db.clone().or_else(|| config.history_db.clone()) {
        Some(path) => HistoryDb::open_at(path),
        None => HistoryDb::open_default(),
    }
}

fn build_dispatcher(config: &ZuriConfig, cli_db: &Option<PathBuf>) -> Result<Dispatcher> {
    let mut dispatcher = Dispatcher::from_config(config)?.with_picker(Arc::new(StdinPicker));

    // History is best-effort: a broken database disables logging but
    // never the assistant.
    match open_history(cli_db, config) {
        Ok(history) => dispatcher = dispatcher.with_history(history),
        Err(e) => warn!("Command history disabled: {}", e),
    }

    Ok(dispatcher)
}

async fn run_once(dispatcher: Dispatcher, text: String, json: bool) -> Result<()> {
    if text.trim().is_empty() {
        println!("Nothing to do - give me a command like \"open resume.pdf\".");
        return Ok(());
    }

    let dispatcher = Arc::new(dispatcher);
    let outcome = tokio::task::spawn_blocking(move || dispatcher.handle(&text)).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    } else {
        println!("{}", outcome.result.message);
    }
    Ok(())
}

async fn repl(dispatcher: Dispatcher) -> Result<()> {
    let dispatcher = Arc::new(dispatcher);

    println!("Hi, I'm Zuri, your file assistant. How can I help you?");
    println!("Type a command, or 'exit' to leave.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let text = line.trim().to_string();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }

        let worker = Arc::clone(&dispatcher);
        let outcome = tokio::task::spawn_blocking(move || worker.handle(&text)).await?;
        println!("{}", outcome.result.message);
    }

    println!("Goodbye.");
    Ok(())
}

fn show_history(cli_db: &Option<PathBuf>, config: &ZuriConfig, limit: usize) -> Result<()> {
    let history = open_history(cli_db, config)?;
    let entries = history.recent(limit)?;

    if entries.is_empty() {
        println!("No command history yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  [{}]  {}",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.intent,
            entry.raw_text
        );
    }
    Ok(())
}
