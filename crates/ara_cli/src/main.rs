//! Terminal front end for the note store.
//!
//! # Responsibility
//! - Map command-line flags onto `StoreConfig` and logging setup.
//! - Run the interactive `section` / `print` / `del` / `done` editing loop.

use anyhow::{bail, Context, Result};
use ara_core::{
    default_log_level, init_logging, PdfCatalog, ReadingSession, Store, StoreConfig, StoreError,
    DEFAULT_DATABASE_NAME, DEFAULT_STORE_URI,
};
use clap::Parser;
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ara")]
#[command(about = "Take structured chapter notes while reading PDFs")]
#[command(version)]
struct Cli {
    /// Store location (`sqlite://<dir>` or `sqlite::memory:`)
    #[arg(long, default_value = DEFAULT_STORE_URI)]
    uri: String,

    /// Database name inside the store
    #[arg(long, default_value = DEFAULT_DATABASE_NAME)]
    database: String,

    /// Schema description file (defaults to the bundled schema)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Username; prompted for when omitted
    #[arg(short, long)]
    user: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(self.uri.clone(), self.database.clone());
        match &self.schema {
            Some(path) => config.with_schema_path(path.clone()),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let dir = dir.to_str().context("log directory must be valid UTF-8")?;
        init_logging(level, dir).context("failed to initialize logging")?;
    }

    let mut store = Store::connect_with(&cli.store_config());
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    info!(
        "event=cli_start module=cli status=ok connected={}",
        store.is_connected()
    );
    if !store.is_connected() {
        warn!("event=cli_start module=cli status=offline");
        console.say("You are not connected to the database. Your work will not be saved.")?;
    }

    let username = match cli.user.clone() {
        Some(user) => user,
        None => console.ask("Enter your username: ")?,
    };
    let result = run(&mut console, &mut store, &username);
    match &result {
        Ok(()) => info!("event=cli_exit module=cli status=ok"),
        Err(err) => warn!("event=cli_exit module=cli status=error error={err}"),
    }
    result
}

/// Line-oriented prompt over any reader/writer pair.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Prints `prompt` and reads one trimmed line.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed");
        }
        Ok(line.trim().to_string())
    }
}

fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &mut Store,
    username: &str,
) -> Result<()> {
    loop {
        edit_notes(console, store, username)?;
        let answer = console.ask("Do you want to exit? (y/n) ")?;
        if answer.eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

fn edit_notes<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &mut Store,
    username: &str,
) -> Result<()> {
    console.say("Enter your notes. Type 'done' to finish.")?;
    let catalog = PdfCatalog::bundled();
    console.say(&format!(
        "Available PDFs: {}",
        catalog.ids().collect::<Vec<_>>().join(", ")
    ))?;
    let pdf_id = console.ask("Enter PDF ID: ")?;
    let mut session = ReadingSession::open(store, username, pdf_id, 1)?;
    if let Some(prompt) = session.prompts().current_prompt() {
        console.say(prompt)?;
    }

    let current_title = session.document().chapter_title.clone();
    let title = console.ask(&format!("Enter chapter title [{current_title}]: "))?;
    if !title.is_empty() {
        session.set_chapter_title(title);
    }

    loop {
        let command = console.ask("Enter a command (section/print/del/list/done): ")?;
        match command.to_ascii_lowercase().as_str() {
            "done" => break,
            "section" => {
                let title = console.ask("Enter section title: ")?;
                let notes = console.ask("Enter section notes: ")?;
                session.add_section(&title, notes);
            }
            "del" => {
                let title = console.ask("Enter section title you want to delete: ")?;
                let removed = session.delete_section(&title)?;
                if removed > 0 {
                    console.say("Section deleted")?;
                } else {
                    console.say("Section not found")?;
                }
            }
            "print" => print_notes(console, &session)?,
            "list" => match session.saved_pdf_ids() {
                Ok(ids) if ids.is_empty() => console.say("No saved notes yet.")?,
                Ok(ids) => console.say(&format!("PDFs with notes: {}", ids.join(", ")))?,
                Err(StoreError::NotConnected) => console.say("Not connected to the database.")?,
                Err(err) => return Err(err).context("failed to list saved notes"),
            },
            _ => console.say("Unknown command.")?,
        }
    }

    match session.save() {
        Ok(outcome) => console.say(&format!("Notes saved ({}).", outcome.as_str()))?,
        Err(StoreError::NotConnected) => {
            console.say("Not connected to the database; notes were not saved.")?
        }
        Err(err) => return Err(err).context("failed to save notes"),
    }
    Ok(())
}

fn print_notes<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &ReadingSession<'_>,
) -> Result<()> {
    let document = session.document();
    console.say(&format!(
        "Notes for user {} on PDF ID {}:",
        session.username(),
        document.pdf_id
    ))?;
    console.say(&format!("Chapter Title: {}", document.chapter_title))?;
    for section in &document.sections {
        console.say(&format!("  Section Title: {}", section.title))?;
        console.say(&format!("  Section Notes: {}", section.notes))?;
        console.say("")?;
    }
    Ok(())
}
