//! Command dispatch over one loaded session.
//!
//! # Responsibility
//! - Open storage, run the single startup load and dispatch commands.
//! - Flatten core errors into user-facing messages.
//!
//! # Invariants
//! - One-shot mutating commands flush before the process exits.
//! - A failed import keeps the previous document and records the error.

use crate::cli::{Cli, Command, DocumentArg};
use crate::render::{render_item, render_overview};
use crate::repl;
use chrono::Local;
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tagboard_core::db::open_db;
use tagboard_core::{
    copy_document, default_log_level, export_and_flush, init_logging, Clipboard, FlushReport,
    PersistenceBridge, Session, SlotRepository, SqliteSlotRepository, ToggleOutcome,
    ValidationError,
};

const DEFAULT_DB_FILE: &str = "tagboard.sqlite3";

/// Whether the caller should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Clipboard that writes copied text to an output stream.
pub struct StreamClipboard<'a, W: Write>(pub &'a mut W);

impl<W: Write> Clipboard for StreamClipboard<'_, W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.0.write_all(text.as_bytes())?;
        self.0.flush()
    }
}

pub struct App<R: SlotRepository> {
    session: Session,
    bridge: PersistenceBridge<R>,
}

impl<R: SlotRepository> App<R> {
    /// Loads the session from `repo`, reporting rejected stored documents to `err`.
    pub fn start(repo: R, err: &mut impl Write) -> Result<Self, String> {
        let mut bridge = PersistenceBridge::new(repo);
        let mut session = Session::new();
        if let Some(report) = bridge.load_once(&mut session).map_err(|e| e.to_string())? {
            for rejected in &report.rejected {
                writeln!(
                    err,
                    "warning: {rejected}; showing built-in defaults, stored {} text is kept until `import` succeeds",
                    rejected.document
                )
                .map_err(io_message)?;
            }
        }
        Ok(Self { session, bridge })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn flush(&mut self) -> Result<FlushReport, String> {
        self.bridge.flush(&self.session).map_err(|err| err.to_string())
    }

    pub fn execute(&mut self, command: &Command, out: &mut impl Write) -> Result<Flow, String> {
        match command {
            Command::Show { item: None } => {
                write!(out, "{}", render_overview(&mut self.session)).map_err(io_message)?;
            }
            Command::Show { item: Some(item) } => {
                let text = render_item(&mut self.session, item)
                    .ok_or_else(|| ValidationError::UnknownItem(item.clone()).to_string())?;
                write!(out, "{text}").map_err(io_message)?;
            }
            Command::AddItem { name } => {
                self.session.add_item(name).map_err(|err| err.to_string())?;
            }
            Command::AddTag { category, name } => {
                self.session
                    .add_tag(category, name)
                    .map_err(|err| err.to_string())?;
            }
            Command::AddCategory { name } => {
                self.session
                    .add_category(name)
                    .map_err(|err| err.to_string())?;
            }
            Command::Toggle { item, tags } => self.toggle(item, tags, out)?,
            Command::Import { document, file } => self.import(*document, file, out)?,
            Command::Export { out_dir } => {
                let bundle = export_and_flush(&mut self.bridge, &self.session, &Local::now())
                    .map_err(|err| err.to_string())?;
                let paths = bundle.write_to(out_dir).map_err(|err| err.to_string())?;
                for path in paths {
                    writeln!(out, "{}", path.display()).map_err(io_message)?;
                }
            }
            Command::Copy { document } => {
                copy_document(&self.session, (*document).into(), &mut StreamClipboard(out))
                    .map_err(|err| err.to_string())?;
            }
            Command::Config { key: None, .. } => {
                let text = self.session.config_text().map_err(|err| err.to_string())?;
                writeln!(out, "{text}").map_err(io_message)?;
            }
            Command::Config {
                key: Some(key),
                value: None,
            } => {
                let value = self.session.config().get(key).unwrap_or("(unset)");
                writeln!(out, "{value}").map_err(io_message)?;
            }
            Command::Config {
                key: Some(key),
                value: Some(value),
            } => {
                self.session.set_config(key, value);
            }
            Command::Errors => match self.session.dismiss_error() {
                Some(err) => {
                    writeln!(out, "{err}\n  near: {}", err.snippet).map_err(io_message)?
                }
                None => writeln!(out, "no pending parse error").map_err(io_message)?,
            },
            Command::Repl => return Err("already in an interactive session".to_string()),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn toggle(&mut self, item: &str, tags: &[String], out: &mut impl Write) -> Result<(), String> {
        let mut pending = self.session.begin_edit(item).map_err(|err| err.to_string())?;
        for tag in tags {
            let mark = match pending.toggle(tag) {
                ToggleOutcome::Added => '+',
                ToggleOutcome::Removed => '-',
            };
            writeln!(out, "{mark}{tag}").map_err(io_message)?;
        }
        self.session
            .commit_edit(pending)
            .map_err(|err| err.to_string())?;
        Ok(())
    }

    fn import(
        &mut self,
        document: DocumentArg,
        file: &Path,
        out: &mut impl Write,
    ) -> Result<(), String> {
        let text = std::fs::read_to_string(file)
            .map_err(|err| format!("failed to read `{}`: {err}", file.display()))?;
        let applied = match document {
            DocumentArg::Tags => self.session.apply_taxonomy_text(&text),
            DocumentArg::Items => self.session.apply_items_text(&text),
            DocumentArg::Config => self.session.apply_configuration_text(&text),
        }
        .map_err(|err| err.to_string())?;
        if !applied {
            writeln!(out, "`{}` is empty; nothing imported", file.display())
                .map_err(io_message)?;
        }
        Ok(())
    }
}

fn io_message(err: io::Error) -> String {
    format!("output failed: {err}")
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE)
}

/// Runs one CLI invocation.
pub fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(|err| err.to_string())?;
    }

    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    let conn = open_db(&db_path).map_err(|err| err.to_string())?;
    let repo = SqliteSlotRepository::try_new(&conn).map_err(|err| err.to_string())?;

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let mut app = App::start(repo, &mut err)?;
    info!("event=cli_start module=cli status=ok");

    match &cli.command {
        Command::Repl => {
            let input = io::BufReader::new(io::stdin());
            repl::run(&mut app, input, &mut out, &mut err)
        }
        command => {
            app.execute(command, &mut out)?;
            if command.mutates() {
                app.flush()?;
            }
            Ok(())
        }
    }
}
