//! Interactive shell over a [`Session`]
//!
//! Line editing runs on its own thread and feeds a channel; the main loop
//! selects between typed lines and pattern-file changes so a watched file
//! reloads while the prompt is waiting.

use crate::cli::CliConfig;
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use crate::report::{render_parsed, render_script_line};
use crate::repl::watcher::{FileEvent, FileWatcher};
use crate::session::Session;
use anyhow::{Context, Result};
use colored::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::ops::ControlFlow;
use std::path::Path;
use std::thread;

pub mod watcher;

type Line = std::result::Result<String, ReadlineError>;

/// Evaluate a pattern file and print one line per expression
pub fn run_file(session: &mut Session, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    for line in session.run_script(&contents) {
        println!("{}", render_script_line(session, &line));
    }
    Ok(())
}

/// Read lines on a background thread until the editor fails or the
/// receiver hangs up. The failing read is forwarded so Ctrl+C and Ctrl+D
/// end the loop.
fn spawn_reader(mut editor: DefaultEditor, lines: Sender<Line>) {
    let prompt = format!("{} ", "rhythm>".bright_magenta().bold());
    thread::spawn(move || loop {
        let line = editor.readline(&prompt).map(|l| l.trim().to_string());
        if let Ok(text) = &line {
            if !text.is_empty() {
                let _ = editor.add_history_entry(text.as_str());
            }
        }
        let failed = line.is_err();
        if lines.send(line).is_err() || failed {
            break;
        }
    });
}

pub struct Repl {
    editor: Option<DefaultEditor>,
    ctx: CommandContext,
    registry: CommandRegistry,
    lines_tx: Sender<Line>,
    lines_rx: Receiver<Line>,
    files_tx: Sender<FileEvent>,
    files_rx: Receiver<FileEvent>,
    /// Created by the first `watch`
    watcher: Option<FileWatcher>,
}

impl Repl {
    pub fn new(config: &CliConfig) -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
        let (lines_tx, lines_rx) = unbounded();
        let (files_tx, files_rx) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            ctx: CommandContext::new(Session::new(config.engine_config())),
            registry: create_registry(),
            lines_tx,
            lines_rx,
            files_tx,
            files_rx,
            watcher: None,
        })
    }

    /// Named patterns print their stored value; anything else is parsed
    fn evaluate_line(&mut self, line: &str) {
        if let Some(pattern) = self.ctx.session.lookup(line) {
            println!("{} = {}", line.bright_green(), self.ctx.session.compact(pattern));
            return;
        }
        match self.ctx.session.evaluate(line) {
            Ok(parsed) => println!("{}", render_parsed(&self.ctx.session, &parsed)),
            Err(e) => println!("{} {}", "Parse error:".bright_red().bold(), e.to_string().red()),
        }
    }

    fn start_watching(&mut self, path: &str) {
        if self.watcher.is_none() {
            match FileWatcher::new(self.files_tx.clone()) {
                Ok(w) => self.watcher = Some(w),
                Err(e) => {
                    println!("{} cannot watch files: {}", "Error:".red(), e);
                    return;
                }
            }
        }
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };
        if let Err(e) = watcher.watch(path) {
            println!("{} cannot watch {}: {}", "Error:".red(), path, e);
            return;
        }
        println!("{} {} (reloads on save)", "watch:".bright_cyan(), path.bright_green());
        self.reload(Path::new(path));
    }

    fn reload(&mut self, path: &Path) {
        if let Err(e) = run_file(&mut self.ctx.session, path) {
            println!("{} {:#}", "Error:".red(), e);
        }
    }

    /// Act on one typed line; `Break` ends the session
    fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        if line.is_empty() {
            return ControlFlow::Continue(());
        }
        match self.registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Error(e) => println!("{} {}", "Error:".bright_red().bold(), e.red()),
            CommandResult::Watch(path) => self.start_watching(&path),
            CommandResult::NotACommand => self.evaluate_line(line),
            CommandResult::Exit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn handle_file_event(&mut self, event: FileEvent) {
        match event {
            FileEvent::Changed(path) => {
                println!("{} {}", "reload:".bright_yellow(), path.display());
                self.reload(&path);
            }
            FileEvent::Failed(e) => println!("{} watch: {}", "Error:".red(), e),
        }
    }

    fn banner() {
        println!("{}", "Rhythm Pattern Explorer".bright_cyan().bold());
        println!(
            "Try {}, {}, {} or {}. {} lists commands; {} leaves.\n",
            "E(3,8)".cyan(),
            "P(3,0)+P(5,1)".cyan(),
            "0x49".cyan(),
            "clave = E(5,16,2)".cyan(),
            "help".bright_green(),
            "quit".bright_red()
        );
    }

    pub fn run(&mut self) -> Result<()> {
        Self::banner();
        let editor = self.editor.take().context("REPL already started")?;
        spawn_reader(editor, self.lines_tx.clone());

        loop {
            let flow = crossbeam_channel::select! {
                recv(self.lines_rx) -> line => match line {
                    Ok(Ok(line)) => self.handle_line(&line),
                    Ok(Err(ReadlineError::Interrupted | ReadlineError::Eof)) | Err(_) => {
                        ControlFlow::Break(())
                    }
                    Ok(Err(err)) => {
                        println!("{} {}", "Input error:".bright_red().bold(), err);
                        ControlFlow::Break(())
                    }
                },
                recv(self.files_rx) -> event => {
                    if let Ok(event) = event {
                        self.handle_file_event(event);
                    }
                    ControlFlow::Continue(())
                }
            };
            if flow.is_break() {
                break;
            }
        }

        println!("{}", "Goodbye!".bright_cyan());
        Ok(())
    }
}

pub fn start(config: &CliConfig) -> Result<()> {
    Repl::new(config)?.run()
}
